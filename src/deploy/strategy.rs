// ABOUTME: Deployment strategy selection based on configuration.
// ABOUTME: Chooses between updating the environment in place and swapping to a new one.

use std::fmt;

use crate::error::{Error, Result};

/// How a new version reaches the public CNAME.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployStrategy {
    /// Update the running environment directly. The environment serves a
    /// mix of versions while the platform rolls the update out.
    #[default]
    InPlace,

    /// Launch a fresh environment from the current one's configuration,
    /// verify it, then swap CNAMEs. The old environment keeps running as a
    /// rollback target.
    SwapToNew,
}

impl DeployStrategy {
    /// Parse the `deployType` option. Absent means in place.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDeployType` for anything but `inPlace` or `swapToNew`.
    pub fn from_option(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("inPlace") => Ok(DeployStrategy::InPlace),
            Some("swapToNew") => Ok(DeployStrategy::SwapToNew),
            Some(other) => Err(Error::UnknownDeployType(other.to_string())),
        }
    }

    /// The option value naming this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStrategy::InPlace => "inPlace",
            DeployStrategy::SwapToNew => "swapToNew",
        }
    }
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
