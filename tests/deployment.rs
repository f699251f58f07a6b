// ABOUTME: End-to-end tests of the deployment sequence against a scripted control plane.
// ABOUTME: Covers in-place and swap deploys, short-circuiting failures, and the final report.

mod support;

use ebdeploy::deploy::{self, DeployError, DeployErrorKind, DeployStrategy};
use ebdeploy::diagnostics::{Diagnostics, WarningKind};
use ebdeploy::output::{Output, OutputMode};
use ebdeploy::platform::{EnvironmentHealth, EnvironmentStatus};
use ebdeploy::types::ApplicationName;
use support::{Call, FakePlatform, ScriptedHttp, environment, ready, response, shop_request};

fn quiet() -> Output {
    Output::new(OutputMode::Quiet)
}

fn live_environments() -> Vec<ebdeploy::platform::Environment> {
    vec![
        ready("shop-staging", "shop-staging.example.com"),
        ready("shop-blue", "shop.example.com"),
    ]
}

mod in_place {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn updates_the_environment_once_and_never_creates_one() {
        support::init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");

        let platform = FakePlatform::new(live_environments()).with_snapshots(vec![
            vec![environment(
                "",
                "shop.example.com",
                EnvironmentStatus::Updating,
                EnvironmentHealth::Grey,
            )],
            vec![ready("", "shop.example.com")],
        ]);
        let http = ScriptedHttp::healthy("OK");
        let mut diag = Diagnostics::default();

        let report = deploy::run(request, &platform, &http, &quiet(), &mut diag)
            .await
            .unwrap();

        assert_eq!(
            platform.count(|c| matches!(c, Call::UpdateEnvironment { .. })),
            1
        );
        assert_eq!(
            platform.count(|c| matches!(c, Call::CreateEnvironment { .. })),
            0
        );
        assert_eq!(
            platform.count(|c| matches!(c, Call::SwapEnvironmentCnames { .. })),
            0
        );
        assert!(platform.calls().contains(&Call::UpdateEnvironment {
            name: "shop-blue".to_string(),
            label: "shop-v2".to_string(),
        }));

        assert_eq!(report.strategy, DeployStrategy::InPlace);
        assert_eq!(report.serving.name, "shop-blue");
        assert!(report.previous.is_none());
        assert_eq!(http.requests(), vec!["shop.example.com/health".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stages_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");

        let platform = FakePlatform::new(live_environments())
            .with_snapshots(vec![vec![ready("", "shop.example.com")]]);
        let http = ScriptedHttp::healthy("OK");

        deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap();

        let calls = platform.calls();
        assert_eq!(calls[0], Call::ApplicationExists("shop".to_string()));
        assert_eq!(
            calls[1],
            Call::DescribeEnvironments {
                names: vec![],
                version_label: None
            }
        );
        assert_eq!(
            calls[2],
            Call::PutObject {
                bucket: "shop".to_string(),
                key: "shop-v2.zip".to_string(),
                len: 10,
            }
        );
        assert_eq!(
            calls[3],
            Call::CreateApplicationVersion {
                label: "shop-v2".to_string(),
                description: String::new(),
            }
        );
        assert!(matches!(calls[4], Call::UpdateEnvironment { .. }));
        assert_eq!(
            calls[5],
            Call::DescribeEnvironments {
                names: vec!["shop-blue".to_string()],
                version_label: Some("shop-v2".to_string()),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn health_timeout_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");

        let platform = FakePlatform::new(live_environments())
            .with_snapshots(vec![vec![ready("", "shop.example.com")]]);
        let http = ScriptedHttp::new(vec![Ok(response(503, ""))]);

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::HealthCheckTimeout(_)));
        assert_eq!(err.kind(), DeployErrorKind::ConvergenceTimeout);
    }
}

mod swap_to_new {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn swaps_old_with_new_exactly_once() {
        support::init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "swapToNew");

        let platform = FakePlatform::new(live_environments()).with_snapshots(vec![
            vec![environment(
                "",
                "shop-new.example.com",
                EnvironmentStatus::Launching,
                EnvironmentHealth::Grey,
            )],
            vec![ready("", "shop-new.example.com")],
        ]);
        let http = ScriptedHttp::healthy("OK");
        let mut diag = Diagnostics::default();

        let report = deploy::run(request, &platform, &http, &quiet(), &mut diag)
            .await
            .unwrap();

        let swaps: Vec<_> = platform
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SwapEnvironmentCnames { .. }))
            .collect();
        let new_name = report.serving.name.clone();
        assert_eq!(
            swaps,
            vec![Call::SwapEnvironmentCnames {
                source: "shop-blue".to_string(),
                destination: new_name.clone(),
            }]
        );
        assert_eq!(
            platform.count(|c| matches!(c, Call::UpdateEnvironment { .. })),
            0
        );

        assert_eq!(new_name.len(), 23);
        assert!(new_name.starts_with("shop"));
        assert!(!diag.has(WarningKind::EnvironmentNameNotUnique));

        assert_eq!(report.serving.cname, "shop.example.com");
        let previous = report.previous.unwrap();
        assert_eq!(previous.name, "shop-blue");
        assert_eq!(previous.cname, "shop-new.example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn long_application_name_warns_but_still_swaps() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = shop_request(dir.path(), "swapToNew");
        request.application = ApplicationName::new("checkout-service-eu-1").unwrap();

        let platform = FakePlatform::new(live_environments())
            .with_snapshots(vec![vec![ready("", "shop-new.example.com")]]);
        let http = ScriptedHttp::healthy("OK");
        let mut diag = Diagnostics::default();

        let report = deploy::run(request, &platform, &http, &quiet(), &mut diag)
            .await
            .unwrap();

        assert!(diag.has(WarningKind::EnvironmentNameNotUnique));
        assert_eq!(report.serving.name.len(), 23);
        assert!(report.serving.name.starts_with("checkout-service-eu-1"));
        assert_eq!(
            platform.count(|c| matches!(c, Call::SwapEnvironmentCnames { .. })),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn template_snapshots_the_old_environment() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "swapToNew");

        let platform = FakePlatform::new(live_environments())
            .with_snapshots(vec![vec![ready("", "shop-new.example.com")]]);
        let http = ScriptedHttp::healthy("OK");

        deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap();

        let calls = platform.calls();
        let template = calls
            .iter()
            .find_map(|c| match c {
                Call::CreateConfigurationTemplate {
                    environment_id,
                    template,
                } => Some((environment_id.clone(), template.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(template.0, "e-shop-blue");
        assert!(template.1.starts_with("shop-"));
        assert!(template.1["shop-".len()..].chars().all(|c| c.is_ascii_digit()));

        assert!(calls.iter().any(|c| matches!(
            c,
            Call::CreateEnvironment { label, template: t, .. }
                if label == "shop-v2" && *t == template.1
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn probes_new_cname_then_public_cname() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "swapToNew");

        let platform = FakePlatform::new(live_environments())
            .with_snapshots(vec![vec![ready("", "shop-new.example.com")]]);
        let http = ScriptedHttp::healthy("OK");

        deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap();

        assert_eq!(
            http.requests(),
            vec![
                "shop-new.example.com/health".to_string(),
                "shop.example.com/health".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_swap_when_new_environment_never_converges() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "swapToNew");

        let platform = FakePlatform::new(live_environments()).with_snapshots(vec![vec![
            environment(
                "",
                "shop-new.example.com",
                EnvironmentStatus::Ready,
                EnvironmentHealth::Red,
            ),
        ]]);
        let http = ScriptedHttp::healthy("OK");

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ConvergenceTimeout { .. }));
        assert_eq!(
            platform.count(|c| matches!(c, Call::SwapEnvironmentCnames { .. })),
            0
        );
        assert!(http.requests().is_empty());
    }
}

mod short_circuit {
    use super::*;

    #[tokio::test]
    async fn missing_application_stops_before_any_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");
        let platform = FakePlatform::new(live_environments()).without_application();
        let http = ScriptedHttp::healthy("OK");

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ApplicationNotFound(ref name) if name == "shop"));
        assert_eq!(err.kind(), DeployErrorKind::NotFound);
        assert_eq!(platform.calls().len(), 1);
    }

    #[tokio::test]
    async fn unmatched_cname_stops_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");
        // Prefix of the requested CNAME must not match
        let platform = FakePlatform::new(vec![ready("shop-blue", "shop.example.com.eu")]);
        let http = ScriptedHttp::healthy("OK");

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::EnvironmentNotFound { .. }));
        assert_eq!(platform.mutations(), 0);
    }

    #[tokio::test]
    async fn rejected_version_stops_before_update() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");
        let platform = FakePlatform::new(live_environments()).failing("CreateApplicationVersion");
        let http = ScriptedHttp::healthy("OK");

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::Remote {
                operation: "CreateApplicationVersion",
                ..
            }
        ));
        assert_eq!(err.kind(), DeployErrorKind::RemoteOperation);
        assert_eq!(
            platform.count(|c| matches!(c, Call::UpdateEnvironment { .. })),
            0
        );
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn rejected_upload_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let request = shop_request(dir.path(), "inPlace");
        let platform = FakePlatform::new(live_environments()).failing("PutObject");
        let http = ScriptedHttp::healthy("OK");

        let err = deploy::run(request, &platform, &http, &quiet(), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::RemoteOperation);
        assert_eq!(platform.count(|c| matches!(c, Call::PutObject { .. })), 1);
        assert_eq!(
            platform.count(|c| matches!(c, Call::CreateApplicationVersion { .. })),
            0
        );
    }
}
