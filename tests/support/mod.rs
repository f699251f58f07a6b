// ABOUTME: Test support utilities.
// ABOUTME: Scripted fakes of the control plane and the health page client, plus request builders.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Once;

use async_trait::async_trait;
use parking_lot::Mutex;

use ebdeploy::config::{CredentialValue, DeployOptions, DeploymentRequest, HealthPageContents};
use ebdeploy::diagnostics::Diagnostics;
use ebdeploy::health::{HealthError, HttpGet, HttpResponse};
use ebdeploy::platform::{
    ApplicationOps, CreateEnvironmentRequest, CreateTemplateRequest, CreateVersionRequest,
    Environment, EnvironmentHealth, EnvironmentOps, EnvironmentQuery, EnvironmentStatus,
    PlatformError, PutObjectRequest, StorageOps, UpdateEnvironmentRequest,
};
use ebdeploy::types::{ApplicationName, EnvironmentId, TemplateName};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("ebdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Snapshot of an environment with the given state.
#[allow(dead_code)]
pub fn environment(
    name: &str,
    cname: &str,
    status: EnvironmentStatus,
    health: EnvironmentHealth,
) -> Environment {
    Environment {
        id: EnvironmentId::new(format!("e-{name}")),
        name: name.to_string(),
        cname: cname.to_string(),
        application_name: "shop".to_string(),
        version_label: Some("v1".to_string()),
        status,
        health,
    }
}

/// A Ready/Green snapshot.
#[allow(dead_code)]
pub fn ready(name: &str, cname: &str) -> Environment {
    environment(name, cname, EnvironmentStatus::Ready, EnvironmentHealth::Green)
}

/// Options for application `shop` on `shop.example.com` with a bundle in `dir`.
#[allow(dead_code)]
pub fn shop_options(dir: &Path) -> DeployOptions {
    std::fs::write(dir.join("shop-v2.zip"), b"PK\x03\x04bundle").unwrap();

    DeployOptions {
        application_name: Some("shop".to_string()),
        environment_cname: Some("shop.example.com".to_string()),
        region: Some("eu-west-1".to_string()),
        source_bundle: Some("shop-v2.zip".into()),
        health_page: Some("health".to_string()),
        health_page_contents: Some(HealthPageContents::Literal("OK".to_string())),
        access_key_id: Some(CredentialValue::Literal("AKIATEST".to_string())),
        secret_access_key: Some(CredentialValue::Literal("secret".to_string())),
        ..Default::default()
    }
}

/// A resolved request for the `shop` application with the given deploy type.
#[allow(dead_code)]
pub fn shop_request(dir: &Path, deploy_type: &str) -> DeploymentRequest {
    let mut options = shop_options(dir);
    options.deploy_type = Some(deploy_type.to_string());
    DeploymentRequest::resolve(&options, dir, &mut Diagnostics::default()).unwrap()
}

/// One recorded control-plane interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    ApplicationExists(String),
    DescribeEnvironments {
        names: Vec<String>,
        version_label: Option<String>,
    },
    PutObject {
        bucket: String,
        key: String,
        len: usize,
    },
    CreateApplicationVersion {
        label: String,
        description: String,
    },
    UpdateEnvironment {
        name: String,
        label: String,
    },
    CreateConfigurationTemplate {
        environment_id: String,
        template: String,
    },
    CreateEnvironment {
        name: String,
        label: String,
        template: String,
    },
    SwapEnvironmentCnames {
        source: String,
        destination: String,
    },
}

/// In-memory control plane with scripted responses.
///
/// Unfiltered describe calls list `environments`. Describe calls naming an
/// environment return the scripted snapshots in order, repeating the last
/// one once the script is exhausted; the snapshot is renamed to the queried
/// environment.
#[allow(dead_code)]
pub struct FakePlatform {
    application_exists: bool,
    environments: Vec<Environment>,
    snapshots: Mutex<VecDeque<Vec<Environment>>>,
    new_environment_cname: String,
    failing_operation: Option<&'static str>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl FakePlatform {
    pub fn new(environments: Vec<Environment>) -> Self {
        Self {
            application_exists: true,
            environments,
            snapshots: Mutex::new(VecDeque::new()),
            new_environment_cname: "shop-new.example.com".to_string(),
            failing_operation: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Describe results for named (convergence) queries, in order.
    pub fn with_snapshots(self, snapshots: Vec<Vec<Environment>>) -> Self {
        *self.snapshots.lock() = snapshots.into();
        self
    }

    pub fn without_application(mut self) -> Self {
        self.application_exists = false;
        self
    }

    /// Reject every call of this operation.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing_operation = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn mutations(&self) -> usize {
        self.count(|c| {
            !matches!(
                c,
                Call::ApplicationExists(_) | Call::DescribeEnvironments { .. }
            )
        })
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), PlatformError> {
        self.calls.lock().push(call);
        if self.failing_operation == Some(operation) {
            return Err(PlatformError::Request {
                operation,
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn next_snapshot(&self, name: &str) -> Vec<Environment> {
        let mut snapshots = self.snapshots.lock();
        let next = if snapshots.len() > 1 {
            snapshots.pop_front()
        } else {
            snapshots.front().cloned()
        };

        next.unwrap_or_default()
            .into_iter()
            .map(|env| Environment {
                name: name.to_string(),
                ..env
            })
            .collect()
    }
}

#[async_trait]
impl ApplicationOps for FakePlatform {
    async fn application_exists(&self, name: &ApplicationName) -> Result<bool, PlatformError> {
        self.record("DescribeApplications", Call::ApplicationExists(name.to_string()))?;
        Ok(self.application_exists)
    }

    async fn create_application_version(
        &self,
        request: &CreateVersionRequest,
    ) -> Result<(), PlatformError> {
        self.record(
            "CreateApplicationVersion",
            Call::CreateApplicationVersion {
                label: request.version_label.clone(),
                description: request.description.clone(),
            },
        )
    }

    async fn create_configuration_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> Result<TemplateName, PlatformError> {
        self.record(
            "CreateConfigurationTemplate",
            Call::CreateConfigurationTemplate {
                environment_id: request.environment_id.to_string(),
                template: request.template_name.to_string(),
            },
        )?;
        Ok(request.template_name.clone())
    }
}

#[async_trait]
impl EnvironmentOps for FakePlatform {
    async fn describe_environments(
        &self,
        query: &EnvironmentQuery,
    ) -> Result<Vec<Environment>, PlatformError> {
        self.record(
            "DescribeEnvironments",
            Call::DescribeEnvironments {
                names: query.environment_names.clone(),
                version_label: query.version_label.clone(),
            },
        )?;

        match query.environment_names.first() {
            Some(name) => Ok(self.next_snapshot(name)),
            None => Ok(self.environments.clone()),
        }
    }

    async fn update_environment(
        &self,
        request: &UpdateEnvironmentRequest,
    ) -> Result<(), PlatformError> {
        self.record(
            "UpdateEnvironment",
            Call::UpdateEnvironment {
                name: request.environment_name.clone(),
                label: request.version_label.clone(),
            },
        )
    }

    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment, PlatformError> {
        self.record(
            "CreateEnvironment",
            Call::CreateEnvironment {
                name: request.environment_name.clone(),
                label: request.version_label.clone(),
                template: request.template_name.to_string(),
            },
        )?;
        Ok(environment(
            &request.environment_name,
            &self.new_environment_cname,
            EnvironmentStatus::Launching,
            EnvironmentHealth::Grey,
        ))
    }

    async fn swap_environment_cnames(
        &self,
        source_environment: &str,
        destination_environment: &str,
    ) -> Result<(), PlatformError> {
        self.record(
            "SwapEnvironmentCNAMEs",
            Call::SwapEnvironmentCnames {
                source: source_environment.to_string(),
                destination: destination_environment.to_string(),
            },
        )
    }
}

#[async_trait]
impl StorageOps for FakePlatform {
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), PlatformError> {
        self.record(
            "PutObject",
            Call::PutObject {
                bucket: request.location.bucket.clone(),
                key: request.location.key.clone(),
                len: request.body.len(),
            },
        )
    }
}

/// Health page client answering from a script.
///
/// Responses are returned in order; the last one repeats once the script is
/// exhausted. Requested `host` + `path` pairs are recorded.
#[allow(dead_code)]
pub struct ScriptedHttp {
    responses: Mutex<VecDeque<Result<HttpResponse, HealthError>>>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedHttp {
    pub fn new(responses: Vec<Result<HttpResponse, HealthError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers 200 with `body`.
    pub fn healthy(body: &str) -> Self {
        Self::new(vec![Ok(response(200, body))])
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[allow(dead_code)]
pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

#[async_trait]
impl HttpGet for ScriptedHttp {
    async fn get(&self, host: &str, path: &str) -> Result<HttpResponse, HealthError> {
        self.requests.lock().push(format!("{host}{path}"));

        let mut responses = self.responses.lock();
        let next = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        next.unwrap_or_else(|| Err(HealthError::Transport("no scripted response".to_string())))
    }
}
