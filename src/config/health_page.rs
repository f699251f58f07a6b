// ABOUTME: Health page configuration as written in the configuration file.
// ABOUTME: Normalizes the path and compiles the expected body into a content matcher.

use crate::error::{Error, Result};
use crate::health::{ContentMatch, HealthCheck};
use regex::Regex;
use serde::Deserialize;

/// Expected health page body: a plain string must match exactly, a
/// `{ pattern: ... }` map is a regular expression searched anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HealthPageContents {
    Literal(String),
    Pattern { pattern: String },
}

impl HealthPageContents {
    /// An empty literal means no expectation.
    pub fn compile(&self) -> Result<Option<ContentMatch>> {
        match self {
            HealthPageContents::Literal(s) if s.is_empty() => Ok(None),
            HealthPageContents::Literal(s) => Ok(Some(ContentMatch::Exact(s.clone()))),
            HealthPageContents::Pattern { pattern } => Regex::new(pattern)
                .map(|re| Some(ContentMatch::Pattern(re)))
                .map_err(|e| {
                    Error::InvalidConfig(format!("invalid healthPageContents pattern: {e}"))
                }),
        }
    }
}

/// Prefix the path with `/` if it does not start with one.
pub fn normalize_health_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Build the health check from the configured page and contents.
///
/// Contents without a page are ignored, since there is nothing to fetch.
pub fn resolve_health_check(
    page: Option<&str>,
    contents: Option<&HealthPageContents>,
) -> Result<HealthCheck> {
    let Some(page) = page.filter(|p| !p.is_empty()) else {
        return Ok(HealthCheck::disabled());
    };

    let expected = match contents {
        Some(contents) => contents.compile()?,
        None => None,
    };
    Ok(HealthCheck::new(normalize_health_path(page), expected))
}
