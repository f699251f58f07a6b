// ABOUTME: Shared types used across control-plane trait definitions.
// ABOUTME: Environment snapshots, status/health enums, and typed request payloads.

use crate::types::{ApplicationName, EnvironmentId, TemplateName};
use bytes::Bytes;
use std::fmt;

/// Lifecycle status reported for an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentStatus {
    Launching,
    Updating,
    Ready,
    Terminating,
    Terminated,
    Aborting,
    LinkingFrom,
    LinkingTo,
    /// A status this tool does not know about, kept verbatim.
    Other(String),
}

impl EnvironmentStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "Launching" => Self::Launching,
            "Updating" => Self::Updating,
            "Ready" => Self::Ready,
            "Terminating" => Self::Terminating,
            "Terminated" => Self::Terminated,
            "Aborting" => Self::Aborting,
            "LinkingFrom" => Self::LinkingFrom,
            "LinkingTo" => Self::LinkingTo,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Launching => "Launching",
            Self::Updating => "Updating",
            Self::Ready => "Ready",
            Self::Terminating => "Terminating",
            Self::Terminated => "Terminated",
            Self::Aborting => "Aborting",
            Self::LinkingFrom => "LinkingFrom",
            Self::LinkingTo => "LinkingTo",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EnvironmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse health colour reported for an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentHealth {
    Green,
    Yellow,
    Red,
    Grey,
    Other(String),
}

impl EnvironmentHealth {
    pub fn parse(value: &str) -> Self {
        match value {
            "Green" => Self::Green,
            "Yellow" => Self::Yellow,
            "Red" => Self::Red,
            "Grey" => Self::Grey,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
            Self::Grey => "Grey",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EnvironmentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an environment as last reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Platform-assigned ID (`e-...`).
    pub id: EnvironmentId,
    /// Environment name, unique within the account and region.
    pub name: String,
    /// Public hostname the environment answers on.
    pub cname: String,
    /// Owning application.
    pub application_name: String,
    /// Version label currently deployed, if any.
    pub version_label: Option<String>,
    pub status: EnvironmentStatus,
    pub health: EnvironmentHealth,
}

impl Environment {
    /// Ready and Green: the only state a deployment may report success from.
    pub fn is_converged(&self) -> bool {
        self.status == EnvironmentStatus::Ready && self.health == EnvironmentHealth::Green
    }
}

/// Filter for describing environments.
#[derive(Debug, Clone)]
pub struct EnvironmentQuery {
    pub application: ApplicationName,
    /// Restrict to these environment names (all when empty).
    pub environment_names: Vec<String>,
    /// Restrict to environments running this version label.
    pub version_label: Option<String>,
    pub include_deleted: bool,
}

impl EnvironmentQuery {
    /// All live environments of an application.
    pub fn for_application(application: &ApplicationName) -> Self {
        Self {
            application: application.clone(),
            environment_names: Vec::new(),
            version_label: None,
            include_deleted: false,
        }
    }

    /// The named environment, only once it runs `version_label`.
    pub fn for_deployment(
        application: &ApplicationName,
        environment_name: &str,
        version_label: &str,
    ) -> Self {
        Self {
            application: application.clone(),
            environment_names: vec![environment_name.to_string()],
            version_label: Some(version_label.to_string()),
            include_deleted: false,
        }
    }
}

/// Location of an object in S3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Upload of a source bundle.
#[derive(Clone)]
pub struct PutObjectRequest {
    pub location: S3Location,
    pub body: Bytes,
}

impl fmt::Debug for PutObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutObjectRequest")
            .field("location", &self.location)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Registration of a new application version.
#[derive(Debug, Clone)]
pub struct CreateVersionRequest {
    pub application: ApplicationName,
    pub version_label: String,
    pub description: String,
    pub source_bundle: S3Location,
}

/// In-place update of an environment to another version.
#[derive(Debug, Clone)]
pub struct UpdateEnvironmentRequest {
    pub environment_name: String,
    pub version_label: String,
    pub description: String,
}

/// Snapshot of an environment's configuration as a reusable template.
#[derive(Debug, Clone)]
pub struct CreateTemplateRequest {
    pub application: ApplicationName,
    pub environment_id: EnvironmentId,
    pub template_name: TemplateName,
}

/// Launch of a new environment from a template.
#[derive(Debug, Clone)]
pub struct CreateEnvironmentRequest {
    pub application: ApplicationName,
    pub environment_name: String,
    pub version_label: String,
    pub template_name: TemplateName,
}
