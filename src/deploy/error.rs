// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers missing resources, rejected platform calls, and convergence or health timeouts.

use std::path::PathBuf;
use std::time::Duration;

use crate::health::HealthError;
use crate::platform::PlatformError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The application does not exist in the target region.
    #[error("application \"{0}\" not found")]
    ApplicationNotFound(String),

    /// No live environment of the application answers on this CNAME.
    #[error("no environment of \"{application}\" with CNAME \"{cname}\"")]
    EnvironmentNotFound { application: String, cname: String },

    /// The source bundle could not be read for upload.
    #[error("failed to read source bundle {}: {source}", path.display())]
    BundleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A control-plane or storage call was rejected.
    #[error("remote operation failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: PlatformError,
    },

    /// The environment did not reach Ready/Green in time.
    #[error(
        "environment \"{environment}\" did not become Ready/Green within {}s ({attempts} checks)",
        timeout.as_secs()
    )]
    ConvergenceTimeout {
        environment: String,
        timeout: Duration,
        attempts: u32,
    },

    /// The health page did not become healthy in time.
    #[error("health check timed out: {0}")]
    HealthCheckTimeout(HealthError),

    /// The health page could not be probed at all.
    #[error("health check failed: {0}")]
    HealthCheck(HealthError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Local input is unusable (unreadable bundle, invalid health URL).
    Configuration,
    /// The application or environment does not exist.
    NotFound,
    /// The platform rejected a call.
    RemoteOperation,
    /// A poll loop ran out of time.
    ConvergenceTimeout,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::ApplicationNotFound(_) | DeployError::EnvironmentNotFound { .. } => {
                DeployErrorKind::NotFound
            }
            DeployError::BundleRead { .. } | DeployError::HealthCheck(_) => {
                DeployErrorKind::Configuration
            }
            DeployError::Remote { .. } => DeployErrorKind::RemoteOperation,
            DeployError::ConvergenceTimeout { .. } | DeployError::HealthCheckTimeout(_) => {
                DeployErrorKind::ConvergenceTimeout
            }
        }
    }
}

impl From<PlatformError> for DeployError {
    fn from(source: PlatformError) -> Self {
        DeployError::Remote {
            operation: source.operation(),
            source,
        }
    }
}

impl From<HealthError> for DeployError {
    fn from(err: HealthError) -> Self {
        match err {
            HealthError::Timeout { .. } => DeployError::HealthCheckTimeout(err),
            other => DeployError::HealthCheck(other),
        }
    }
}
