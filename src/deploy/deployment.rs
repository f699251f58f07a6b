// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::DeploymentRequest;
use crate::platform::Environment;
use crate::types::ApplicationName;

use super::state::{
    BundleUploaded, Deployed, EnvironmentResolved, Initialized, VersionRegistered,
};
use super::strategy::DeployStrategy;

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the
/// resolved environment) directly in the state type. This enables
/// compile-time enforcement that the target environment is known before a
/// bundle is uploaded, and that a version exists before it is deployed.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Start a deployment from a resolved request.
    pub fn new(request: DeploymentRequest) -> Self {
        Deployment {
            request,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn application(&self) -> &ApplicationName {
        &self.request.application
    }

    pub fn version_label(&self) -> &str {
        &self.request.version_label
    }

    pub fn strategy(&self) -> DeployStrategy {
        self.request.strategy
    }

    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    /// Move to the next state, keeping the request.
    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            state,
        }
    }
}

// State-specific accessors for the target environment
impl Deployment<EnvironmentResolved> {
    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }
}

impl Deployment<BundleUploaded> {
    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }
}

impl Deployment<VersionRegistered> {
    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }
}

impl Deployment<Deployed> {
    /// The environment now answering on the public CNAME.
    pub fn serving(&self) -> &Environment {
        &self.state.serving
    }

    /// The environment that served before a swap, kept for rollback.
    pub fn previous(&self) -> Option<&Environment> {
        self.state.previous.as_ref()
    }

    /// Finish the deployment and summarize it.
    pub fn finish(self) -> DeploymentReport {
        DeploymentReport {
            application: self.request.application,
            version_label: self.request.version_label,
            strategy: self.request.strategy,
            serving: self.state.serving,
            previous: self.state.previous,
        }
    }
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub application: ApplicationName,
    pub version_label: String,
    pub strategy: DeployStrategy,
    /// Converged snapshot of the environment running the new version.
    pub serving: Environment,
    /// For swap deploys, the environment that now holds the old CNAME.
    pub previous: Option<Environment>,
}

impl DeploymentReport {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        match &self.previous {
            Some(previous) => format!(
                "Deployed {} {} to {} ({}); previous environment {} kept for rollback",
                self.application,
                self.version_label,
                self.serving.name,
                self.serving.cname,
                previous.name
            ),
            None => format!(
                "Deployed {} {} to {} ({})",
                self.application, self.version_label, self.serving.name, self.serving.cname
            ),
        }
    }
}
