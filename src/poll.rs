// ABOUTME: Generic poll-until-satisfied primitive with a fixed interval and an overall deadline.
// ABOUTME: Used for environment convergence and health page probing.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::PollSettings;

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T, E> {
    /// Not there yet; check again after the interval.
    Pending(String),
    /// Done.
    Satisfied(T),
    /// Will never succeed; stop polling.
    Failed(E),
}

/// Whether the first check waits for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstCheck {
    Immediate,
    AfterInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError<E> {
    #[error("timed out after {}s ({attempts} checks)", timeout.as_secs())]
    TimedOut { timeout: Duration, attempts: u32 },

    #[error("{0}")]
    Failed(E),
}

/// Run `check` until it is satisfied, fails, or `settings.timeout` elapses.
///
/// Checks are separated by `settings.interval`. The deadline is fixed when
/// polling starts and is checked before every attempt; an attempt still in
/// flight at the deadline is cancelled. `check` receives the 1-based attempt
/// number.
pub async fn poll_until<T, E, F, Fut>(
    settings: PollSettings,
    first: FirstCheck,
    mut check: F,
) -> Result<T, PollError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = PollOutcome<T, E>>,
{
    let deadline = Instant::now() + settings.timeout;
    let mut attempts = 0u32;

    let result = tokio::time::timeout_at(deadline, async {
        loop {
            if attempts > 0 || first == FirstCheck::AfterInterval {
                tokio::time::sleep(settings.interval).await;
            }

            if Instant::now() >= deadline {
                return Err(PollError::TimedOut {
                    timeout: settings.timeout,
                    attempts,
                });
            }

            attempts += 1;
            match check(attempts).await {
                PollOutcome::Satisfied(value) => return Ok(value),
                PollOutcome::Failed(reason) => return Err(PollError::Failed(reason)),
                PollOutcome::Pending(reason) => {
                    tracing::debug!(attempt = attempts, %reason, "poll pending");
                }
            }
        }
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(PollError::TimedOut {
            timeout: settings.timeout,
            attempts,
        }),
    }
}
