// ABOUTME: Waits for an environment to converge after an update or launch.
// ABOUTME: Converged means the expected version is running with status Ready and health Green.

use crate::config::PollSettings;
use crate::output::Output;
use crate::platform::{Environment, EnvironmentOps, EnvironmentQuery, EnvironmentStatus, PlatformError};
use crate::poll::{FirstCheck, PollError, PollOutcome, poll_until};

use super::error::DeployError;

/// Classify one describe result.
pub(crate) fn classify(snapshots: Vec<Environment>) -> PollOutcome<Environment, PlatformError> {
    let Some(environment) = snapshots.into_iter().next() else {
        return PollOutcome::Pending("environment not listed yet".to_string());
    };

    if environment.status != EnvironmentStatus::Ready {
        return PollOutcome::Pending(format!(
            "status {}, health {}",
            environment.status, environment.health
        ));
    }
    if !environment.is_converged() {
        return PollOutcome::Pending(format!("status Ready, health {}", environment.health));
    }

    PollOutcome::Satisfied(environment)
}

/// Poll `query` until the first matching environment is Ready and Green.
///
/// Every describe call, the first included, is preceded by
/// `settings.interval`. A rejected describe call aborts at once.
///
/// # Errors
///
/// Returns `DeployError::ConvergenceTimeout` when `settings.timeout` elapses,
/// or `DeployError::Remote` when the platform rejects a describe call.
pub async fn wait_for_environment<P>(
    platform: &P,
    query: &EnvironmentQuery,
    settings: PollSettings,
    output: &Output,
) -> Result<Environment, DeployError>
where
    P: EnvironmentOps + ?Sized,
{
    let name = query.environment_names.join(", ");

    output.progress(&format!(
        "  → Waiting for {name} to become Ready/Green (timing out in {} minutes)...",
        (settings.timeout.as_secs_f64() / 60.0).round()
    ));

    let result = poll_until(settings, FirstCheck::AfterInterval, |attempt| async move {
        let outcome = match platform.describe_environments(query).await {
            Ok(snapshots) => classify(snapshots),
            Err(e) => PollOutcome::Failed(e),
        };

        if let PollOutcome::Pending(reason) = &outcome {
            output.progress(&format!("    check {attempt}: {reason}"));
        }
        outcome
    })
    .await;

    match result {
        Ok(environment) => {
            output.progress(&format!("  ✓ {} is Ready/Green", environment.name));
            tracing::info!(environment = %environment.name, "environment converged");
            Ok(environment)
        }
        Err(PollError::TimedOut { timeout, attempts }) => Err(DeployError::ConvergenceTimeout {
            environment: name,
            timeout,
            attempts,
        }),
        Err(PollError::Failed(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::EnvironmentHealth;
    use crate::types::EnvironmentId;

    fn snapshot(status: EnvironmentStatus, health: EnvironmentHealth) -> Environment {
        Environment {
            id: EnvironmentId::new("e-abc123".to_string()),
            name: "shop-prod".to_string(),
            cname: "shop.example.com".to_string(),
            application_name: "shop".to_string(),
            version_label: Some("v2".to_string()),
            status,
            health,
        }
    }

    #[test]
    fn empty_result_is_pending() {
        assert!(matches!(classify(vec![]), PollOutcome::Pending(_)));
    }

    #[test]
    fn updating_is_pending_even_when_green() {
        let outcome = classify(vec![snapshot(
            EnvironmentStatus::Updating,
            EnvironmentHealth::Green,
        )]);
        assert!(matches!(outcome, PollOutcome::Pending(reason) if reason.contains("Updating")));
    }

    #[test]
    fn ready_but_yellow_is_pending() {
        let outcome = classify(vec![snapshot(
            EnvironmentStatus::Ready,
            EnvironmentHealth::Yellow,
        )]);
        assert!(matches!(outcome, PollOutcome::Pending(reason) if reason.contains("Yellow")));
    }

    #[test]
    fn ready_and_green_is_satisfied() {
        let outcome = classify(vec![snapshot(
            EnvironmentStatus::Ready,
            EnvironmentHealth::Green,
        )]);
        assert!(matches!(outcome, PollOutcome::Satisfied(env) if env.name == "shop-prod"));
    }
}
