// ABOUTME: Top-level deployment sequence driving the state machine.
// ABOUTME: Verifies, resolves, uploads, registers, then dispatches to the configured strategy.

use crate::config::DeploymentRequest;
use crate::diagnostics::Diagnostics;
use crate::health::HttpGet;
use crate::output::Output;
use crate::platform::ControlPlane;

use super::deployment::{Deployment, DeploymentReport};
use super::error::DeployError;
use super::strategy::DeployStrategy;

/// Run a complete deployment.
///
/// Stages run strictly in order and the first failure ends the run; no
/// remote call is retried. Non-fatal findings are recorded in `diag`.
///
/// # Errors
///
/// Returns the error of the first failing stage.
pub async fn run<P, C>(
    request: DeploymentRequest,
    platform: &P,
    http: &C,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<DeploymentReport, DeployError>
where
    P: ControlPlane + ?Sized,
    C: HttpGet + ?Sized,
{
    let deployment = Deployment::new(request);

    output.progress(&format!(
        "  → Checking application {}...",
        deployment.application()
    ));
    let deployment = deployment.verify_application(platform).await?;

    output.progress(&format!(
        "  → Looking up environment for {}...",
        deployment.request().environment_cname
    ));
    let deployment = deployment.resolve_environment(platform).await?;
    output.progress(&format!(
        "  ✓ Found {} ({}, {}/{})",
        deployment.environment().name,
        deployment.environment().id,
        deployment.environment().status,
        deployment.environment().health
    ));

    output.progress(&format!(
        "  → Uploading {} to s3://{}...",
        deployment.request().source_bundle.display(),
        deployment.request().bundle_location
    ));
    let deployment = deployment.upload_bundle(platform).await?;
    output.progress("  ✓ Bundle uploaded");

    output.progress(&format!(
        "  → Creating application version {}...",
        deployment.version_label()
    ));
    let deployment = deployment.register_version(platform).await?;
    output.progress("  ✓ Version created");
    tracing::info!(
        application = %deployment.application(),
        version = deployment.version_label(),
        "application version registered"
    );

    let deployment = match deployment.strategy() {
        DeployStrategy::InPlace => deployment.deploy_in_place(platform, http, output).await?,
        DeployStrategy::SwapToNew => {
            deployment
                .swap_to_new(platform, http, output, diag)
                .await?
        }
    };

    Ok(deployment.finish())
}
