// ABOUTME: Application-level control-plane operations.
// ABOUTME: Existence checks, version registration, and configuration templates.

use super::shared_types::{CreateTemplateRequest, CreateVersionRequest};
use crate::platform::PlatformError;
use crate::types::{ApplicationName, TemplateName};
use async_trait::async_trait;

/// Operations scoped to an application.
#[async_trait]
pub trait ApplicationOps: Send + Sync {
    /// Check whether an application with this name exists.
    async fn application_exists(&self, name: &ApplicationName) -> Result<bool, PlatformError>;

    /// Register a new application version pointing at an uploaded bundle.
    async fn create_application_version(
        &self,
        request: &CreateVersionRequest,
    ) -> Result<(), PlatformError>;

    /// Snapshot an environment's configuration into a named template.
    async fn create_configuration_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> Result<TemplateName, PlatformError>;
}
