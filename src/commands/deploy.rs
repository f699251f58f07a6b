// ABOUTME: Deploy command implementation.
// ABOUTME: Resolves the request, connects to AWS, and runs the deployment state machine.

use std::env;

use ebdeploy::config::DeploymentRequest;
use ebdeploy::deploy;
use ebdeploy::diagnostics::Diagnostics;
use ebdeploy::error::Result;
use ebdeploy::health::HyperClient;
use ebdeploy::output::Output;
use ebdeploy::platform::AwsPlatform;

use super::options::load_options;
use crate::cli::ConfigArgs;

/// Deploy the configured bundle to the selected environment.
pub async fn deploy(
    args: &ConfigArgs,
    version_label: Option<String>,
    deploy_type: Option<String>,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let cwd = env::current_dir()?;
    let mut diag = Diagnostics::default();

    let (mut options, base_dir) = load_options(args, &cwd)?;
    if version_label.is_some() {
        options.version_label = version_label;
    }
    if deploy_type.is_some() {
        options.deploy_type = deploy_type;
    }

    let request = DeploymentRequest::resolve(&options, &base_dir, &mut diag)?;

    output.progress(&format!(
        "Deploying {} {} to {} ({})",
        request.application, request.version_label, request.environment_cname, request.strategy
    ));

    let platform = AwsPlatform::connect(&request.region, &request.credentials).await;
    let http = HyperClient::new();

    let result = deploy::run(request, &platform, &http, &output, &mut diag).await;

    diag.report(&output);

    let report = result?;
    output.success(&report.summary());
    Ok(())
}
