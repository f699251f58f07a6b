// ABOUTME: Application-level health verification of a deployed environment.
// ABOUTME: Polls the health page until it answers 200 with the expected body, or times out.

mod client;

pub use client::{HttpGet, HttpResponse, HyperClient};

use regex::Regex;
use std::time::Duration;

use crate::config::PollSettings;
use crate::output::Output;
use crate::poll::{FirstCheck, PollError, PollOutcome, poll_until};

/// Expected health page body.
#[derive(Debug, Clone)]
pub enum ContentMatch {
    /// Body must equal this string exactly.
    Exact(String),
    /// Body must contain a match of this pattern.
    Pattern(Regex),
}

impl ContentMatch {
    pub fn matches(&self, body: &str) -> bool {
        match self {
            ContentMatch::Exact(expected) => body == expected,
            ContentMatch::Pattern(re) => re.is_match(body),
        }
    }
}

impl std::fmt::Display for ContentMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentMatch::Exact(s) => write!(f, "{s:?}"),
            ContentMatch::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// What to probe after a deployment. Disabled when no path is configured.
#[derive(Debug, Clone, Default)]
pub struct HealthCheck {
    path: Option<String>,
    expected: Option<ContentMatch>,
}

impl HealthCheck {
    pub fn new(path: impl Into<String>, expected: Option<ContentMatch>) -> Self {
        Self {
            path: Some(path.into()),
            expected,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn expected(&self) -> Option<&ContentMatch> {
        self.expected.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("invalid health page URL: {0}")]
    InvalidUrl(String),

    #[error("health page request failed: {0}")]
    Transport(String),

    #[error("health page of {host} not healthy after {}s ({attempts} checks)", timeout.as_secs())]
    Timeout {
        host: String,
        timeout: Duration,
        attempts: u32,
    },
}

/// Classify one health page response.
fn classify(
    response: &HttpResponse,
    expected: Option<&ContentMatch>,
) -> PollOutcome<(), HealthError> {
    if response.status != 200 {
        return PollOutcome::Pending(format!("status {}", response.status));
    }

    match expected {
        Some(expected) if !expected.matches(&response.body) => {
            PollOutcome::Pending(format!("got {:?}, expected {expected}", response.body))
        }
        _ => PollOutcome::Satisfied(()),
    }
}

/// Wait until the health page on `host` is healthy.
///
/// The first request is sent immediately, later ones after `settings.interval`.
/// Non-200 responses, body mismatches and transport failures are retried
/// until `settings.timeout`. Returns at once without any request when the
/// check is disabled.
pub async fn wait_for_health_page<C>(
    client: &C,
    check: &HealthCheck,
    host: &str,
    settings: PollSettings,
    output: &Output,
) -> Result<(), HealthError>
where
    C: HttpGet + ?Sized,
{
    let Some(path) = check.path() else {
        tracing::debug!(host, "no health page configured, skipping probe");
        return Ok(());
    };
    let expected = check.expected();

    output.progress(&format!(
        "  → Checking health page http://{host}{path} (timing out in {} minutes)...",
        (settings.timeout.as_secs_f64() / 60.0).round()
    ));

    let result = poll_until(settings, FirstCheck::Immediate, |attempt| async move {
        let outcome = match client.get(host, path).await {
            Ok(response) => classify(&response, expected),
            Err(HealthError::Transport(reason)) => PollOutcome::Pending(reason),
            Err(e) => PollOutcome::Failed(e),
        };

        if let PollOutcome::Pending(reason) = &outcome {
            output.progress(&format!("    health page check {attempt}: {reason}"));
        }
        outcome
    })
    .await;

    match result {
        Ok(()) => {
            output.progress(&format!("  ✓ Health page of {host} is healthy"));
            Ok(())
        }
        Err(PollError::TimedOut { timeout, attempts }) => Err(HealthError::Timeout {
            host: host.to_string(),
            timeout,
            attempts,
        }),
        Err(PollError::Failed(e)) => Err(e),
    }
}
