// ABOUTME: Poll interval and timeout configuration for convergence waits.
// ABOUTME: Separate settings for in-place convergence, new-environment convergence, and health probing.

use serde::Deserialize;
use std::time::Duration;

/// How often to check and how long to keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Convergence after an in-place update.
    pub const DEPLOYMENT: Self = Self::new(Duration::from_secs(5), Duration::from_secs(2 * 60));

    /// Convergence of a freshly provisioned environment.
    pub const SWAP_DEPLOYMENT: Self =
        Self::new(Duration::from_secs(20), Duration::from_secs(10 * 60));

    /// Health page probing.
    pub const HEALTH: Self = Self::new(Duration::from_secs(5), Duration::from_secs(5 * 60));
}

/// Poll settings as written in the configuration file; unset fields use defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PollOverride {
    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl PollOverride {
    fn apply(&self, defaults: PollSettings) -> PollSettings {
        PollSettings {
            interval: self.interval.unwrap_or(defaults.interval),
            timeout: self.timeout.unwrap_or(defaults.timeout),
        }
    }
}

/// The `polling` section of the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingConfig {
    #[serde(default)]
    pub deployment: Option<PollOverride>,
    #[serde(default)]
    pub swap_deployment: Option<PollOverride>,
    #[serde(default)]
    pub health: Option<PollOverride>,
}

impl PollingConfig {
    /// Section-wise merge; `other` wins where it sets a section.
    pub fn merged_with(&self, other: &PollingConfig) -> PollingConfig {
        PollingConfig {
            deployment: other.deployment.or(self.deployment),
            swap_deployment: other.swap_deployment.or(self.swap_deployment),
            health: other.health.or(self.health),
        }
    }

    pub fn resolve(&self) -> Polling {
        let apply = |section: Option<PollOverride>, defaults| {
            section.map(|s| s.apply(defaults)).unwrap_or(defaults)
        };

        Polling {
            deployment: apply(self.deployment, PollSettings::DEPLOYMENT),
            swap_deployment: apply(self.swap_deployment, PollSettings::SWAP_DEPLOYMENT),
            health: apply(self.health, PollSettings::HEALTH),
        }
    }
}

/// Resolved poll settings for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    pub deployment: PollSettings,
    pub swap_deployment: PollSettings,
    pub health: PollSettings,
}

impl Default for Polling {
    fn default() -> Self {
        PollingConfig::default().resolve()
    }
}
