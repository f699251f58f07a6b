// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use bytes::Bytes;
use chrono::Utc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::health::{HttpGet, wait_for_health_page};
use crate::output::Output;
use crate::platform::{
    ApplicationOps, CreateEnvironmentRequest, CreateTemplateRequest, CreateVersionRequest,
    Environment, EnvironmentOps, EnvironmentQuery, PutObjectRequest, StorageOps,
    UpdateEnvironmentRequest,
};
use crate::types::{ApplicationName, derive_environment_name, template_name};

use super::Deployment;
use super::convergence::wait_for_environment;
use super::error::DeployError;
use super::state::{
    ApplicationVerified, BundleUploaded, Deployed, EnvironmentResolved, Initialized,
    VersionRegistered,
};

/// Find the live environment of `application` answering on exactly `cname`.
///
/// # Errors
///
/// Returns `DeployError::EnvironmentNotFound` when no environment matches.
pub async fn find_environment<P>(
    platform: &P,
    application: &ApplicationName,
    cname: &str,
) -> Result<Environment, DeployError>
where
    P: EnvironmentOps + ?Sized,
{
    let environments = platform
        .describe_environments(&EnvironmentQuery::for_application(application))
        .await?;

    environments
        .into_iter()
        .find(|env| env.cname == cname)
        .ok_or_else(|| DeployError::EnvironmentNotFound {
            application: application.to_string(),
            cname: cname.to_string(),
        })
}

// =============================================================================
// Initialized -> ApplicationVerified
// =============================================================================

impl Deployment<Initialized> {
    /// Check that the application exists.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ApplicationNotFound` if it does not, or
    /// `DeployError::Remote` if the check itself fails.
    #[must_use = "deployment state must be used"]
    pub async fn verify_application<P>(
        self,
        platform: &P,
    ) -> Result<Deployment<ApplicationVerified>, DeployError>
    where
        P: ApplicationOps + ?Sized,
    {
        if !platform.application_exists(self.application()).await? {
            return Err(DeployError::ApplicationNotFound(self.application().to_string()));
        }
        Ok(self.transition(ApplicationVerified))
    }
}

// =============================================================================
// ApplicationVerified -> EnvironmentResolved
// =============================================================================

impl Deployment<ApplicationVerified> {
    /// Select the environment whose CNAME equals the requested one.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::EnvironmentNotFound` when no live environment of
    /// the application matches.
    #[must_use = "deployment state must be used"]
    pub async fn resolve_environment<P>(
        self,
        platform: &P,
    ) -> Result<Deployment<EnvironmentResolved>, DeployError>
    where
        P: EnvironmentOps + ?Sized,
    {
        let environment =
            find_environment(platform, self.application(), &self.request.environment_cname)
                .await?;
        tracing::debug!(environment = %environment.name, id = %environment.id, "resolved target");
        Ok(self.transition(EnvironmentResolved { environment }))
    }
}

// =============================================================================
// EnvironmentResolved -> BundleUploaded
// =============================================================================

impl Deployment<EnvironmentResolved> {
    /// Upload the source bundle to its S3 location.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::BundleRead` if the file cannot be read, or
    /// `DeployError::Remote` if the upload is rejected.
    #[must_use = "deployment state must be used"]
    pub async fn upload_bundle<P>(
        self,
        platform: &P,
    ) -> Result<Deployment<BundleUploaded>, DeployError>
    where
        P: StorageOps + ?Sized,
    {
        let path = &self.request.source_bundle;
        let body = tokio::fs::read(path)
            .await
            .map_err(|source| DeployError::BundleRead {
                path: path.clone(),
                source,
            })?;

        platform
            .put_object(PutObjectRequest {
                location: self.request.bundle_location.clone(),
                body: Bytes::from(body),
            })
            .await?;

        let EnvironmentResolved { environment } = self.state;
        Ok(Deployment {
            request: self.request,
            state: BundleUploaded { environment },
        })
    }
}

// =============================================================================
// BundleUploaded -> VersionRegistered
// =============================================================================

impl Deployment<BundleUploaded> {
    /// Register the uploaded bundle as a new application version.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if registration is rejected, for example
    /// because the label already exists.
    #[must_use = "deployment state must be used"]
    pub async fn register_version<P>(
        self,
        platform: &P,
    ) -> Result<Deployment<VersionRegistered>, DeployError>
    where
        P: ApplicationOps + ?Sized,
    {
        platform
            .create_application_version(&CreateVersionRequest {
                application: self.request.application.clone(),
                version_label: self.request.version_label.clone(),
                description: self.request.version_description.clone(),
                source_bundle: self.request.bundle_location.clone(),
            })
            .await?;

        let BundleUploaded { environment } = self.state;
        Ok(Deployment {
            request: self.request,
            state: VersionRegistered { environment },
        })
    }
}

// =============================================================================
// VersionRegistered -> Deployed
// =============================================================================

impl Deployment<VersionRegistered> {
    /// Update the target environment to the new version, wait for it to
    /// converge, then probe its health page.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if the update is rejected, or a timeout
    /// error if convergence or the health check does not complete in time.
    #[must_use = "deployment state must be used"]
    pub async fn deploy_in_place<P, C>(
        self,
        platform: &P,
        http: &C,
        output: &Output,
    ) -> Result<Deployment<Deployed>, DeployError>
    where
        P: EnvironmentOps + ?Sized,
        C: HttpGet + ?Sized,
    {
        let target = &self.state.environment;
        let request = &self.request;

        output.progress(&format!(
            "  → Updating {} to {}...",
            target.name, request.version_label
        ));
        platform
            .update_environment(&UpdateEnvironmentRequest {
                environment_name: target.name.clone(),
                version_label: request.version_label.clone(),
                description: request.version_description.clone(),
            })
            .await?;

        let query = EnvironmentQuery::for_deployment(
            &request.application,
            &target.name,
            &request.version_label,
        );
        let converged =
            wait_for_environment(platform, &query, request.polling.deployment, output).await?;

        wait_for_health_page(
            http,
            &request.health_check,
            &converged.cname,
            request.polling.health,
            output,
        )
        .await?;

        Ok(self.transition(Deployed {
            serving: converged,
            previous: None,
        }))
    }

    /// Launch a new environment from the target's configuration, verify it,
    /// and swap CNAMEs with the target.
    ///
    /// The old environment is neither updated nor terminated; after the swap
    /// it keeps running under the new environment's former CNAME.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if any platform call is rejected, or a
    /// timeout error if convergence or a health check does not complete in
    /// time. Nothing created before the failure is cleaned up.
    #[must_use = "deployment state must be used"]
    pub async fn swap_to_new<P, C>(
        self,
        platform: &P,
        http: &C,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Result<Deployment<Deployed>, DeployError>
    where
        P: ApplicationOps + EnvironmentOps + ?Sized,
        C: HttpGet + ?Sized,
    {
        let old = &self.state.environment;
        let request = &self.request;
        let now = Utc::now();

        output.progress(&format!("  → Saving configuration of {}...", old.name));
        let template = platform
            .create_configuration_template(&CreateTemplateRequest {
                application: request.application.clone(),
                environment_id: old.id.clone(),
                template_name: template_name(&request.application, now),
            })
            .await?;

        let derived = derive_environment_name(&request.application, now);
        if !derived.unique {
            diag.warn(Warning::environment_name_not_unique(
                request.application.as_str(),
                derived.name.as_str(),
            ));
        }

        output.progress(&format!(
            "  → Creating environment {} from template {}...",
            derived.name, template
        ));
        let created = platform
            .create_environment(&CreateEnvironmentRequest {
                application: request.application.clone(),
                environment_name: derived.name,
                version_label: request.version_label.clone(),
                template_name: template,
            })
            .await?;

        let query = EnvironmentQuery::for_deployment(
            &request.application,
            &created.name,
            &request.version_label,
        );
        let converged =
            wait_for_environment(platform, &query, request.polling.swap_deployment, output)
                .await?;

        wait_for_health_page(
            http,
            &request.health_check,
            &converged.cname,
            request.polling.health,
            output,
        )
        .await?;

        output.progress(&format!(
            "  → Swapping CNAMEs of {} and {}...",
            old.name, converged.name
        ));
        platform
            .swap_environment_cnames(&old.name, &converged.name)
            .await?;

        // The new environment now answers on the original public CNAME
        wait_for_health_page(
            http,
            &request.health_check,
            &old.cname,
            request.polling.health,
            output,
        )
        .await?;

        let serving = Environment {
            cname: old.cname.clone(),
            ..converged.clone()
        };
        let previous = Environment {
            cname: converged.cname,
            ..old.clone()
        };

        Ok(self.transition(Deployed {
            serving,
            previous: Some(previous),
        }))
    }
}
