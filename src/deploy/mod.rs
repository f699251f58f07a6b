// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, and the top-level run sequence.

mod convergence;
mod deployment;
mod error;
mod pipeline;
mod state;
mod strategy;
mod transitions;

pub use convergence::wait_for_environment;
pub use deployment::{Deployment, DeploymentReport};
pub use error::{DeployError, DeployErrorKind};
pub use pipeline::run;
pub use state::{
    ApplicationVerified, BundleUploaded, Deployed, EnvironmentResolved, Initialized,
    VersionRegistered,
};
pub use strategy::DeployStrategy;
pub use transitions::find_environment;
