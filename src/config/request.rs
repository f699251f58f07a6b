// ABOUTME: Validated, immutable input of a deployment run.
// ABOUTME: Enforces required options, checks the bundle exists, and fills in defaults.

use std::path::{Path, PathBuf};

use crate::deploy::DeployStrategy;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::health::HealthCheck;
use crate::platform::S3Location;
use crate::types::ApplicationName;

use super::{Credentials, DeployOptions, Polling, resolve_health_check};

/// Everything a deployment run needs, resolved before any remote call.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub application: ApplicationName,
    /// Public CNAME identifying the environment to deploy to.
    pub environment_cname: String,
    pub region: String,
    pub source_bundle: PathBuf,
    pub version_label: String,
    pub version_description: String,
    pub strategy: DeployStrategy,
    pub bundle_location: S3Location,
    pub health_check: HealthCheck,
    pub credentials: Credentials,
    pub polling: Polling,
}

fn required<'a>(value: Option<&'a str>, option: &'static str) -> Result<&'a str> {
    value.filter(|v| !v.is_empty()).ok_or(Error::MissingOption(option))
}

/// The environment a command operates on and how to reach its region.
#[derive(Debug, Clone)]
pub struct EnvironmentTarget {
    pub application: ApplicationName,
    pub environment_cname: String,
    pub region: String,
    pub credentials: Credentials,
}

impl EnvironmentTarget {
    /// Resolve only what is needed to address the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing application name, CNAME,
    /// or region, or for credentials that cannot be resolved.
    pub fn resolve(options: &DeployOptions) -> Result<Self> {
        let application_name = required(options.application_name.as_deref(), "applicationName")?;
        let environment_cname =
            required(options.environment_cname.as_deref(), "environmentCNAME")?;
        let region = required(options.region.as_deref(), "region")?;

        let application = ApplicationName::new(application_name)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let credentials = Credentials::resolve(
            options.access_key_id.as_ref(),
            options.secret_access_key.as_ref(),
        )?;

        Ok(Self {
            application,
            environment_cname: environment_cname.to_string(),
            region: region.to_string(),
            credentials,
        })
    }
}

impl DeploymentRequest {
    /// Validate options and fill defaults.
    ///
    /// A relative `sourceBundle` is resolved against `base_dir`. A missing
    /// health page is allowed but recorded as a warning in `diag`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for missing required options, a bundle
    /// path that is not a file, an unknown deploy type, an invalid content
    /// pattern, or credentials that cannot be resolved.
    pub fn resolve(options: &DeployOptions, base_dir: &Path, diag: &mut Diagnostics) -> Result<Self> {
        let EnvironmentTarget {
            application,
            environment_cname,
            region,
            credentials,
        } = EnvironmentTarget::resolve(options)?;

        let source_bundle = options
            .source_bundle
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(Error::MissingOption("sourceBundle"))?;

        let source_bundle = base_dir.join(source_bundle);
        if !source_bundle.is_file() {
            return Err(Error::BundleNotFound(source_bundle));
        }

        let health_check = resolve_health_check(
            options.health_page.as_deref(),
            options.health_page_contents.as_ref(),
        )?;
        if !health_check.is_enabled() {
            diag.warn(Warning::MissingHealthPage);
        }

        let strategy = DeployStrategy::from_option(options.deploy_type.as_deref())?;

        let bundle_file_name = file_name(&source_bundle)?;
        let version_label = match options.version_label.as_deref().filter(|v| !v.is_empty()) {
            Some(label) => label.to_string(),
            None => file_stem(&source_bundle)?,
        };

        let bundle_location = S3Location {
            bucket: options
                .s3
                .bucket
                .clone()
                .unwrap_or_else(|| application.to_string()),
            key: options.s3.key.clone().unwrap_or(bundle_file_name),
        };

        Ok(Self {
            application,
            environment_cname,
            region,
            source_bundle,
            version_label,
            version_description: options.version_description.clone().unwrap_or_default(),
            strategy,
            bundle_location,
            health_check,
            credentials,
            polling: options.polling.resolve(),
        })
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::BundleNotFound(path.to_path_buf()))
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::BundleNotFound(path.to_path_buf()))
}
