// ABOUTME: Non-fatal findings of a deploy run, such as an unchecked health page or a colliding name.
// ABOUTME: Collected during resolution and the swap flow, then reported whether or not the run failed.

use std::fmt;

use crate::output::Output;

/// Warnings gathered over one run, in the order they were raised.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. It is logged right away and reported at the end.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn has(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind() == kind)
    }

    /// Print every warning through `output`.
    pub fn report(&self, output: &Output) {
        for warning in &self.warnings {
            output.warning(&warning.to_string());
        }
    }
}

/// Something worth telling the user that does not stop the deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Only the platform's own health is verified.
    MissingHealthPage,
    /// Too few digits left to tell generated environment names apart.
    EnvironmentNameNotUnique {
        application: String,
        environment_name: String,
    },
}

impl Warning {
    pub fn environment_name_not_unique(
        application: impl Into<String>,
        environment_name: impl Into<String>,
    ) -> Self {
        Self::EnvironmentNameNotUnique {
            application: application.into(),
            environment_name: environment_name.into(),
        }
    }

    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::MissingHealthPage => WarningKind::MissingHealthPage,
            Warning::EnvironmentNameNotUnique { .. } => WarningKind::EnvironmentNameNotUnique,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingHealthPage => {
                write!(f, "\"healthPage\" is not set, it is recommended to set one")
            }
            Warning::EnvironmentNameNotUnique {
                application,
                environment_name,
            } => write!(
                f,
                "application name \"{application}\" is longer than 20 characters, \
                 environment name {environment_name} may not be unique"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingHealthPage,
    EnvironmentNameNotUnique,
}
