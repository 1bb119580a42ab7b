//! Non-fatal configuration warnings.

use std::fmt::Display;

use arcstr::ArcStr;
use diagnostics::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};

/// A finding that does not stop generation but should be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationWarning {
    /// What triggered the warning.
    pub cause: WarningCause,
    severity: Severity,
}

/// The causes of a [`ConfigurationWarning`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WarningCause {
    /// The active technology is not one the component library was written for.
    UnsupportedTechnology {
        /// The active technology name.
        technology: ArcStr,
        /// The component library raising the warning.
        library: ArcStr,
    },
    /// A geometric ratio is legal but in a range known to misbehave.
    RiskyGeometry {
        /// The generator raising the warning.
        component: ArcStr,
        /// What is risky.
        message: ArcStr,
    },
}

impl ConfigurationWarning {
    /// Creates a warning with [`Severity::Warning`].
    pub fn new(cause: WarningCause) -> Self {
        Self {
            cause,
            severity: Severity::Warning,
        }
    }

    /// Creates a warning and logs it immediately.
    pub fn new_and_log(cause: WarningCause) -> Self {
        let warning = Self::new(cause);
        warning.log();
        warning
    }
}

impl Display for ConfigurationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            WarningCause::UnsupportedTechnology {
                technology,
                library,
            } => write!(
                f,
                "Current default technology {technology} does not seem supported by the {library} component library."
            ),
            WarningCause::RiskyGeometry { component, message } => {
                write!(f, "{component}: {message}")
            }
        }
    }
}

impl Diagnostic for ConfigurationWarning {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn help(&self) -> Option<Box<dyn Display>> {
        match self.cause {
            WarningCause::UnsupportedTechnology { .. } => None,
            WarningCause::RiskyGeometry { .. } => {
                Some(Box::new("check the generated geometry before fabrication"))
            }
        }
    }
}
