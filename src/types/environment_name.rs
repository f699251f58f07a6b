// ABOUTME: Name generation for environments and configuration templates created by swap deploys.
// ABOUTME: Appends time-derived digits to the application name within the platform's length limit.

use chrono::{DateTime, Utc};

use super::ApplicationName;
use super::id::TemplateName;

/// Environment names must stay within this many characters.
pub const MAX_ENVIRONMENT_NAME_LEN: usize = 23;

/// Fewer suffix digits than this and two deploys may collide.
const MIN_SUFFIX_LEN: usize = 3;

/// A generated environment name and whether it can be considered unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedEnvironmentName {
    pub name: String,
    /// False when the application name leaves fewer than three digits for the suffix.
    pub unique: bool,
}

/// Derive a name for a fresh environment of `application`.
///
/// The application name is followed by the trailing digits of the current
/// epoch milliseconds, as many as fit in [`MAX_ENVIRONMENT_NAME_LEN`]. Short
/// application names get a zero-padded suffix so the result always fills the
/// limit. Names longer than the limit are returned unchanged.
pub fn derive_environment_name(
    application: &ApplicationName,
    now: DateTime<Utc>,
) -> DerivedEnvironmentName {
    let len = application.char_len();
    let available = MAX_ENVIRONMENT_NAME_LEN.saturating_sub(len);

    let millis = now.timestamp_millis().unsigned_abs();
    let digits = format!("{millis:0>available$}");
    let suffix = &digits[digits.len() - available..];

    DerivedEnvironmentName {
        name: format!("{application}{suffix}"),
        unique: len <= MAX_ENVIRONMENT_NAME_LEN - MIN_SUFFIX_LEN,
    }
}

/// Name for the configuration template snapshotting an environment.
pub fn template_name(application: &ApplicationName, now: DateTime<Utc>) -> TemplateName {
    TemplateName::new(format!("{application}-{}", now.timestamp_millis()))
}
