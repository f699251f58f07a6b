// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent mixing environment and template identifiers.

mod application_name;
mod environment_name;
mod id;

pub use application_name::{ApplicationName, ApplicationNameError};
pub use environment_name::{
    DerivedEnvironmentName, MAX_ENVIRONMENT_NAME_LEN, derive_environment_name, template_name,
};
pub use id::{EnvironmentId, TemplateName};
