// ABOUTME: Credential values with environment variable fallback.
// ABOUTME: Resolves access keys from literals, named variables, or the standard AWS variables.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// A credential as written in the configuration file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CredentialValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl CredentialValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            CredentialValue::Literal(s) => Ok(s.clone()),
            CredentialValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

impl fmt::Debug for CredentialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialValue::Literal(_) => f.write_str("Literal(<redacted>)"),
            CredentialValue::FromEnv { var, .. } => {
                f.debug_struct("FromEnv").field("var", var).finish()
            }
        }
    }
}

/// Static credentials used for every AWS call of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Resolve from configured values, falling back to the standard AWS
    /// environment variables. Empty values count as missing.
    pub fn resolve(
        access_key_id: Option<&CredentialValue>,
        secret_access_key: Option<&CredentialValue>,
    ) -> Result<Self> {
        let access_key_id = resolve_one(access_key_id, ACCESS_KEY_ID_VAR)?
            .ok_or(Error::MissingCredential("accessKeyId", ACCESS_KEY_ID_VAR))?;
        let secret_access_key = resolve_one(secret_access_key, SECRET_ACCESS_KEY_VAR)?
            .ok_or(Error::MissingCredential(
                "secretAccessKey",
                SECRET_ACCESS_KEY_VAR,
            ))?;

        Ok(Self {
            access_key_id,
            secret_access_key,
        })
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

fn resolve_one(configured: Option<&CredentialValue>, fallback_var: &str) -> Result<Option<String>> {
    let value = match configured {
        Some(value) => Some(value.resolve()?),
        None => None,
    };

    Ok(value
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(fallback_var).ok())
        .filter(|v| !v.is_empty()))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}
