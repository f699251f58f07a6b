// ABOUTME: Validated Elastic Beanstalk application name.
// ABOUTME: Enforces the platform's length limit and forbidden characters.

use std::fmt;
use thiserror::Error;

const MAX_APPLICATION_NAME_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplicationNameError {
    #[error("application name cannot be empty")]
    Empty,

    #[error("application name exceeds maximum length of 100 characters")]
    TooLong,

    #[error("application name cannot contain '/'")]
    ContainsSlash,

    #[error("application name cannot start or end with whitespace")]
    SurroundingWhitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationName(String);

impl ApplicationName {
    pub fn new(value: &str) -> Result<Self, ApplicationNameError> {
        if value.is_empty() {
            return Err(ApplicationNameError::Empty);
        }

        if value.chars().count() > MAX_APPLICATION_NAME_LEN {
            return Err(ApplicationNameError::TooLong);
        }

        if value.contains('/') {
            return Err(ApplicationNameError::ContainsSlash);
        }

        if value.trim() != value {
            return Err(ApplicationNameError::SurroundingWhitespace);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is what the environment name limit counts.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
