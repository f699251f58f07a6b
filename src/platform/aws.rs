// ABOUTME: AWS SDK backed control plane.
// ABOUTME: Implements the capability traits on top of Elastic Beanstalk and S3 clients.

use crate::config::Credentials;
use crate::platform::error::{IncompleteResponseSnafu, PlatformError};
use crate::platform::traits::{
    ApplicationOps, CreateEnvironmentRequest, CreateTemplateRequest, CreateVersionRequest,
    Environment, EnvironmentHealth, EnvironmentOps, EnvironmentQuery, EnvironmentStatus,
    PutObjectRequest, StorageOps, UpdateEnvironmentRequest,
};
use crate::types::{ApplicationName, EnvironmentId, TemplateName};
use async_trait::async_trait;
use aws_sdk_elasticbeanstalk as eb;
use aws_sdk_elasticbeanstalk::error::DisplayErrorContext;
use aws_sdk_s3 as s3;
use snafu::OptionExt;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn request_error<E>(operation: &'static str, err: E) -> PlatformError
where
    E: std::error::Error,
{
    PlatformError::Request {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

/// Accessors shared by `EnvironmentDescription` and `CreateEnvironmentOutput`.
trait EnvironmentFields {
    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
    fn cname(&self) -> Option<&str>;
    fn application(&self) -> Option<&str>;
    fn version(&self) -> Option<&str>;
    fn status(&self) -> Option<&str>;
    fn health(&self) -> Option<&str>;
}

macro_rules! environment_fields {
    ($ty:ty) => {
        impl EnvironmentFields for $ty {
            fn id(&self) -> Option<&str> {
                self.environment_id()
            }
            fn name(&self) -> Option<&str> {
                self.environment_name()
            }
            fn cname(&self) -> Option<&str> {
                self.cname()
            }
            fn application(&self) -> Option<&str> {
                self.application_name()
            }
            fn version(&self) -> Option<&str> {
                self.version_label()
            }
            fn status(&self) -> Option<&str> {
                self.status().map(|s| s.as_str())
            }
            fn health(&self) -> Option<&str> {
                self.health().map(|h| h.as_str())
            }
        }
    };
}

environment_fields!(eb::types::EnvironmentDescription);
environment_fields!(eb::operation::create_environment::CreateEnvironmentOutput);

fn to_environment<T: EnvironmentFields>(
    operation: &'static str,
    raw: &T,
) -> Result<Environment, PlatformError> {
    let id = raw.id().context(IncompleteResponseSnafu {
        operation,
        field: "EnvironmentId",
    })?;
    let name = raw.name().context(IncompleteResponseSnafu {
        operation,
        field: "EnvironmentName",
    })?;

    Ok(Environment {
        id: EnvironmentId::from(id),
        name: name.to_string(),
        // A freshly launched environment may not have its CNAME assigned yet.
        cname: raw.cname().unwrap_or_default().to_string(),
        application_name: raw.application().unwrap_or_default().to_string(),
        version_label: raw.version().map(str::to_string),
        status: EnvironmentStatus::parse(raw.status().unwrap_or_default()),
        health: EnvironmentHealth::parse(raw.health().unwrap_or_default()),
    })
}

// =============================================================================
// Client
// =============================================================================

/// Elastic Beanstalk + S3 clients sharing one region and credential set.
#[derive(Debug, Clone)]
pub struct AwsPlatform {
    eb: eb::Client,
    s3: s3::Client,
}

impl AwsPlatform {
    /// Build clients for `region` using already-resolved static credentials.
    pub async fn connect(region: &str, credentials: &Credentials) -> Self {
        let provider = eb::config::Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            None,
            None,
            "ebdeploy",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(eb::config::Region::new(region.to_string()))
            .credentials_provider(provider)
            .load()
            .await;

        tracing::debug!(region, "configured AWS clients");

        Self {
            eb: eb::Client::new(&sdk_config),
            s3: s3::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ApplicationOps for AwsPlatform {
    async fn application_exists(&self, name: &ApplicationName) -> Result<bool, PlatformError> {
        tracing::debug!(application = %name, "DescribeApplications");
        let output = self
            .eb
            .describe_applications()
            .application_names(name.as_str())
            .send()
            .await
            .map_err(|e| request_error("DescribeApplications", e))?;

        Ok(!output.applications().is_empty())
    }

    async fn create_application_version(
        &self,
        request: &CreateVersionRequest,
    ) -> Result<(), PlatformError> {
        tracing::debug!(
            application = %request.application,
            version = %request.version_label,
            "CreateApplicationVersion"
        );
        let bundle = eb::types::S3Location::builder()
            .s3_bucket(&request.source_bundle.bucket)
            .s3_key(&request.source_bundle.key)
            .build();

        self.eb
            .create_application_version()
            .application_name(request.application.as_str())
            .version_label(&request.version_label)
            .description(&request.description)
            .source_bundle(bundle)
            .send()
            .await
            .map_err(|e| request_error("CreateApplicationVersion", e))?;

        Ok(())
    }

    async fn create_configuration_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> Result<TemplateName, PlatformError> {
        tracing::debug!(
            environment = %request.environment_id,
            template = %request.template_name,
            "CreateConfigurationTemplate"
        );
        let output = self
            .eb
            .create_configuration_template()
            .application_name(request.application.as_str())
            .environment_id(request.environment_id.as_str())
            .template_name(request.template_name.as_str())
            .send()
            .await
            .map_err(|e| request_error("CreateConfigurationTemplate", e))?;

        let name = output.template_name().context(IncompleteResponseSnafu {
            operation: "CreateConfigurationTemplate",
            field: "TemplateName",
        })?;

        Ok(TemplateName::from(name))
    }
}

#[async_trait]
impl EnvironmentOps for AwsPlatform {
    async fn describe_environments(
        &self,
        query: &EnvironmentQuery,
    ) -> Result<Vec<Environment>, PlatformError> {
        tracing::debug!(?query, "DescribeEnvironments");
        let mut call = self
            .eb
            .describe_environments()
            .application_name(query.application.as_str())
            .include_deleted(query.include_deleted);

        for name in &query.environment_names {
            call = call.environment_names(name);
        }
        if let Some(label) = &query.version_label {
            call = call.version_label(label);
        }

        let output = call
            .send()
            .await
            .map_err(|e| request_error("DescribeEnvironments", e))?;

        output
            .environments()
            .iter()
            .map(|env| to_environment("DescribeEnvironments", env))
            .collect()
    }

    async fn update_environment(
        &self,
        request: &UpdateEnvironmentRequest,
    ) -> Result<(), PlatformError> {
        tracing::debug!(
            environment = %request.environment_name,
            version = %request.version_label,
            "UpdateEnvironment"
        );
        self.eb
            .update_environment()
            .environment_name(&request.environment_name)
            .version_label(&request.version_label)
            .description(&request.description)
            .send()
            .await
            .map_err(|e| request_error("UpdateEnvironment", e))?;

        Ok(())
    }

    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment, PlatformError> {
        tracing::debug!(
            environment = %request.environment_name,
            template = %request.template_name,
            "CreateEnvironment"
        );
        let output = self
            .eb
            .create_environment()
            .application_name(request.application.as_str())
            .environment_name(&request.environment_name)
            .version_label(&request.version_label)
            .template_name(request.template_name.as_str())
            .send()
            .await
            .map_err(|e| request_error("CreateEnvironment", e))?;

        to_environment("CreateEnvironment", &output)
    }

    async fn swap_environment_cnames(
        &self,
        source_environment: &str,
        destination_environment: &str,
    ) -> Result<(), PlatformError> {
        tracing::debug!(
            source = source_environment,
            destination = destination_environment,
            "SwapEnvironmentCNAMEs"
        );
        self.eb
            .swap_environment_cnames()
            .source_environment_name(source_environment)
            .destination_environment_name(destination_environment)
            .send()
            .await
            .map_err(|e| request_error("SwapEnvironmentCNAMEs", e))?;

        Ok(())
    }
}

#[async_trait]
impl StorageOps for AwsPlatform {
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), PlatformError> {
        tracing::debug!(location = %request.location, bytes = request.body.len(), "PutObject");
        self.s3
            .put_object()
            .bucket(&request.location.bucket)
            .key(&request.location.key)
            .body(s3::primitives::ByteStream::from(request.body))
            .send()
            .await
            .map_err(|e| request_error("PutObject", e))?;

        Ok(())
    }
}
