// ABOUTME: Application-wide error types for ebdeploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::deploy::DeployError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("missing \"{0}\"")]
    MissingOption(&'static str),

    #[error("missing \"{0}\" (set it in the configuration or via {1})")]
    MissingCredential(&'static str, &'static str),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("\"sourceBundle\" points to a non-existent file: {0}")]
    BundleNotFound(PathBuf),

    #[error("deploy type \"{0}\" unrecognized")]
    UnknownDeployType(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for errors raised while validating options, before any remote call.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Error::Deploy(_) | Error::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
