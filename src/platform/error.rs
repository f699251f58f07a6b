// ABOUTME: Control-plane error types with SNAFU pattern.
// ABOUTME: Carries the failing operation name and the service message verbatim.

use snafu::Snafu;

/// Failure of a single control-plane or storage call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PlatformError {
    #[snafu(display("{operation} failed: {message}"))]
    Request {
        operation: &'static str,
        message: String,
    },

    #[snafu(display("{operation} response is missing {field}"))]
    IncompleteResponse {
        operation: &'static str,
        field: &'static str,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// The service or transport rejected the call.
    Request,
    /// The call succeeded but the response lacked a required field.
    IncompleteResponse,
}

impl PlatformError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PlatformErrorKind {
        match self {
            PlatformError::Request { .. } => PlatformErrorKind::Request,
            PlatformError::IncompleteResponse { .. } => PlatformErrorKind::IncompleteResponse,
        }
    }

    /// Name of the API operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            PlatformError::Request { operation, .. }
            | PlatformError::IncompleteResponse { operation, .. } => operation,
        }
    }
}
