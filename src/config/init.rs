// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates ebdeploy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ApplicationName;

use super::CONFIG_FILENAME;

pub fn init_config(
    dir: &Path,
    application: Option<&str>,
    cname: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let application = ApplicationName::new(application.unwrap_or("my-app"))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    let cname = cname
        .map(str::to_string)
        .unwrap_or_else(|| format!("{application}.eu-west-1.elasticbeanstalk.com"));

    std::fs::write(&config_path, generate_template_yaml(&application, &cname))?;

    Ok(())
}

fn generate_template_yaml(application: &ApplicationName, cname: &str) -> String {
    format!(
        r#"applicationName: {application}
environmentCNAME: {cname}
region: eu-west-1
sourceBundle: dist/{application}.zip

# Path probed on the environment after deployment (recommended)
healthPage: /health
# Expected body: a plain string must match exactly,
# `pattern:` is a regular expression searched anywhere in the body
# healthPageContents:
#   pattern: "ok"

# inPlace (default) or swapToNew
deployType: inPlace

# Defaults: bucket = applicationName, key = bundle file name
# s3:
#   bucket: {application}
#   key: {application}.zip

# Defaults to AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY
# accessKeyId:
#   env: DEPLOY_ACCESS_KEY_ID

# polling:
#   deployment: {{ interval: 5s, timeout: 2m }}
#   swapDeployment: {{ interval: 20s, timeout: 10m }}
#   health: {{ interval: 5s, timeout: 5m }}

# targets:
#   staging:
#     environmentCNAME: {application}-staging.eu-west-1.elasticbeanstalk.com
"#
    )
}
