// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Later states carry the environment snapshots their transitions produced.

use crate::platform::Environment;

/// Initial state: request resolved, nothing checked remotely yet.
/// Available actions: `verify_application()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// The application exists.
/// Available actions: `resolve_environment()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationVerified;

/// The environment answering on the requested CNAME is known.
/// Available actions: `upload_bundle()`
#[derive(Debug, Clone)]
pub struct EnvironmentResolved {
    pub(crate) environment: Environment,
}

/// The source bundle is in S3.
/// Available actions: `register_version()`
#[derive(Debug, Clone)]
pub struct BundleUploaded {
    pub(crate) environment: Environment,
}

/// The application version exists and can be deployed.
/// Available actions: `deploy_in_place()`, `swap_to_new()`
#[derive(Debug, Clone)]
pub struct VersionRegistered {
    pub(crate) environment: Environment,
}

/// The new version is serving the public CNAME.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) serving: Environment,
    pub(crate) previous: Option<Environment>,
}
