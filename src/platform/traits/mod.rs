// ABOUTME: Composable capability traits for the deployment control plane.
// ABOUTME: Defines ApplicationOps, EnvironmentOps, StorageOps and the ControlPlane umbrella.

mod application;
mod environment;
mod shared_types;
mod storage;

pub use application::ApplicationOps;
pub use environment::EnvironmentOps;
pub use shared_types::*;
pub use storage::StorageOps;

/// Everything a deployment needs from the platform.
///
/// Implemented automatically for any type providing all three capabilities.
pub trait ControlPlane: ApplicationOps + EnvironmentOps + StorageOps {}

impl<T> ControlPlane for T where T: ApplicationOps + EnvironmentOps + StorageOps {}
