// ABOUTME: Configuration types and parsing for ebdeploy.yml.
// ABOUTME: Handles YAML parsing, file discovery, and per-target option merging.

mod credentials;
mod health_page;
mod init;
mod polling;
mod request;

pub use credentials::{
    ACCESS_KEY_ID_VAR, CredentialValue, Credentials, SECRET_ACCESS_KEY_VAR,
};
pub use health_page::{HealthPageContents, normalize_health_path, resolve_health_check};
pub use init::init_config;
pub use polling::{PollOverride, PollSettings, Polling, PollingConfig};
pub use request::{DeploymentRequest, EnvironmentTarget};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "ebdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "ebdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ebdeploy/config.yml";

/// Root of the configuration file: default options plus named targets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub options: DeployOptions,

    #[serde(default)]
    pub targets: HashMap<String, DeployOptions>,
}

/// Every recognized deployment option. All optional at this layer; required
/// ones are enforced by [`DeploymentRequest::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOptions {
    #[serde(default)]
    pub application_name: Option<String>,

    #[serde(default, rename = "environmentCNAME")]
    pub environment_cname: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub source_bundle: Option<PathBuf>,

    #[serde(default)]
    pub health_page: Option<String>,

    #[serde(default)]
    pub health_page_contents: Option<HealthPageContents>,

    #[serde(default)]
    pub version_label: Option<String>,

    #[serde(default)]
    pub version_description: Option<String>,

    #[serde(default)]
    pub deploy_type: Option<String>,

    #[serde(default)]
    pub s3: S3Options,

    #[serde(default)]
    pub access_key_id: Option<CredentialValue>,

    #[serde(default)]
    pub secret_access_key: Option<CredentialValue>,

    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Options {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl DeployOptions {
    /// Overlay `other` on top of these options; set values in `other` win.
    pub fn merged_with(&self, other: &DeployOptions) -> DeployOptions {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }

        DeployOptions {
            application_name: pick(&self.application_name, &other.application_name),
            environment_cname: pick(&self.environment_cname, &other.environment_cname),
            region: pick(&self.region, &other.region),
            source_bundle: pick(&self.source_bundle, &other.source_bundle),
            health_page: pick(&self.health_page, &other.health_page),
            health_page_contents: pick(&self.health_page_contents, &other.health_page_contents),
            version_label: pick(&self.version_label, &other.version_label),
            version_description: pick(&self.version_description, &other.version_description),
            deploy_type: pick(&self.deploy_type, &other.deploy_type),
            s3: S3Options {
                bucket: pick(&self.s3.bucket, &other.s3.bucket),
                key: pick(&self.s3.key, &other.s3.key),
            },
            access_key_id: pick(&self.access_key_id, &other.access_key_id),
            secret_access_key: pick(&self.secret_access_key, &other.secret_access_key),
            polling: self.polling.merged_with(&other.polling),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Options for a named target, layered over the top-level options.
    pub fn for_target(&self, name: &str) -> Result<DeployOptions> {
        let target = self
            .targets
            .get(name)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))?;

        Ok(self.options.merged_with(target))
    }

    /// Options for an optional target; the top-level options when none is given.
    pub fn options_for(&self, target: Option<&str>) -> Result<DeployOptions> {
        match target {
            Some(name) => self.for_target(name),
            None => Ok(self.options.clone()),
        }
    }
}
