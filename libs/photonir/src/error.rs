//! Error types and error handling utilities.

use std::path::PathBuf;
use std::sync::Arc;

use arcstr::ArcStr;

/// A result type returning photonir errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for photonir functions.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A numeric or structural precondition on generator arguments is violated.
    ///
    /// The condition always states the violated inequality.
    #[error("invalid parameter: condition '{condition}' is not satisfied")]
    InvalidParameter {
        /// The condition that must hold.
        condition: String,
    },
    /// A lookup by name failed.
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// The kind of object looked up (port, port specification, layer, ...).
        kind: &'static str,
        /// The name that was looked up.
        name: ArcStr,
    },
    /// A name was registered twice.
    #[error("{kind} `{name}` already exists")]
    DuplicateName {
        /// The kind of object being registered.
        kind: &'static str,
        /// The colliding name.
        name: ArcStr,
    },
    /// Adding a reference would make a component (transitively) contain itself.
    #[error("referencing `{child}` from `{parent}` would create a cycle")]
    Cycle {
        /// The component receiving the reference.
        parent: ArcStr,
        /// The referenced component.
        child: ArcStr,
    },
    /// A technology failed validation.
    #[error("invalid technology: {0}")]
    InvalidTechnology(String),
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] Arc<std::io::Error>),
    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] Arc<serde_json::Error>),
    /// A generated layout differs from its golden layout by more than the tolerance.
    #[error("layout `{family}` differs from golden: diff ratio {ratio:e} exceeds tolerance {tolerance:e}")]
    RegressionFailed {
        /// The component family.
        family: ArcStr,
        /// Total difference area divided by total golden area.
        ratio: f64,
        /// The tolerance applied to this family.
        tolerance: f64,
    },
    /// No golden layout exists for a component family.
    #[error("no golden layout for `{family}` at {path:?}")]
    MissingGolden {
        /// The component family.
        family: ArcStr,
        /// The expected location of the golden layout.
        path: PathBuf,
    },
}

impl Error {
    /// Creates an [`Error::InvalidParameter`] for the given condition.
    pub fn invalid_parameter(condition: impl Into<String>) -> Self {
        Self::InvalidParameter {
            condition: condition.into(),
        }
    }

    /// Creates an [`Error::NotFound`].
    pub fn not_found(kind: &'static str, name: impl Into<ArcStr>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates an [`Error::DuplicateName`].
    pub fn duplicate(kind: &'static str, name: impl Into<ArcStr>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(Arc::new(value))
    }
}

/// Returns an [`Error::InvalidParameter`] unless `cond` holds.
///
/// The condition text should state the inequality that must hold.
pub fn ensure(cond: bool, condition: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(Error::invalid_parameter(condition))
    }
}
