// ABOUTME: Status command implementation.
// ABOUTME: Read-only view of the environment answering on the configured CNAME.

use std::env;

use serde::Serialize;

use ebdeploy::config::EnvironmentTarget;
use ebdeploy::deploy::find_environment;
use ebdeploy::error::Result;
use ebdeploy::output::{Output, OutputMode};
use ebdeploy::platform::AwsPlatform;
use ebdeploy::types::EnvironmentId;

use super::options::load_options;
use crate::cli::ConfigArgs;

#[derive(Serialize)]
struct StatusView<'a> {
    application: &'a str,
    environment: &'a str,
    id: &'a EnvironmentId,
    cname: &'a str,
    status: &'a str,
    health: &'a str,
    version_label: Option<&'a str>,
}

/// Print status, health and running version of the target environment.
pub async fn status(args: &ConfigArgs, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let (options, _) = load_options(args, &cwd)?;
    let target = EnvironmentTarget::resolve(&options)?;

    let platform = AwsPlatform::connect(&target.region, &target.credentials).await;
    let environment =
        find_environment(&platform, &target.application, &target.environment_cname).await?;

    let view = StatusView {
        application: target.application.as_str(),
        environment: &environment.name,
        id: &environment.id,
        cname: &environment.cname,
        status: environment.status.as_str(),
        health: environment.health.as_str(),
        version_label: environment.version_label.as_deref(),
    };

    match output.mode() {
        OutputMode::Json => {
            if let Ok(json) = serde_json::to_string(&view) {
                println!("{json}");
            }
        }
        OutputMode::Normal | OutputMode::Quiet => {
            println!("Application: {}", view.application);
            println!("Environment: {} ({})", view.environment, view.id);
            println!("CNAME: {}", view.cname);
            println!("Status: {}", view.status);
            println!("Health: {}", view.health);
            println!("Version: {}", view.version_label.unwrap_or("-"));
        }
    }

    Ok(())
}
