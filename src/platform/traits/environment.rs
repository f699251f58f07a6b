// ABOUTME: Environment control-plane operations.
// ABOUTME: Describe, update, create, and swap CNAMEs between environments.

use super::shared_types::{
    CreateEnvironmentRequest, Environment, EnvironmentQuery, UpdateEnvironmentRequest,
};
use crate::platform::PlatformError;
use async_trait::async_trait;

/// Environment lifecycle operations.
#[async_trait]
pub trait EnvironmentOps: Send + Sync {
    /// List environments matching the query.
    async fn describe_environments(
        &self,
        query: &EnvironmentQuery,
    ) -> Result<Vec<Environment>, PlatformError>;

    /// Deploy a version to a running environment.
    async fn update_environment(
        &self,
        request: &UpdateEnvironmentRequest,
    ) -> Result<(), PlatformError>;

    /// Launch a new environment. Returns the initial snapshot.
    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment, PlatformError>;

    /// Exchange the CNAMEs of two environments.
    async fn swap_environment_cnames(
        &self,
        source_environment: &str,
        destination_environment: &str,
    ) -> Result<(), PlatformError>;
}
