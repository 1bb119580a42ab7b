//! The explicitly threaded generation context.

use std::sync::Arc;

use diagnostics::IssueSet;

use crate::library::Library;
use crate::technology::Technology;
use crate::warning::{ConfigurationWarning, WarningCause};

/// Everything a generator needs: the active technology, the component arena
/// and a place to record warnings.
#[derive(Debug, Clone)]
pub struct Context {
    /// The active technology.
    pub technology: Arc<Technology>,
    /// The component arena.
    pub library: Library,
    /// Warnings raised so far.
    pub issues: IssueSet<ConfigurationWarning>,
}

impl Context {
    /// Creates a context with an empty library.
    pub fn new(technology: impl Into<Arc<Technology>>) -> Self {
        Self {
            technology: technology.into(),
            library: Library::new(),
            issues: IssueSet::new(),
        }
    }

    /// Logs a warning and records it.
    pub fn warn(&mut self, cause: WarningCause) {
        self.issues.add_and_log(ConfigurationWarning::new(cause));
    }

    /// Replaces the active technology, keeping the library and recorded warnings.
    pub fn with_technology(mut self, technology: impl Into<Arc<Technology>>) -> Self {
        self.technology = technology.into();
        self
    }
}
