//! Utilities for collecting diagnostics.
//!
//! Diagnostics are non-fatal findings raised while generating layouts,
//! such as a geometric ratio in a risky range. They are logged when raised
//! and collected in an [`IssueSet`] for later inspection.

#![warn(missing_docs)]

#[cfg(test)]
pub(crate) mod tests;

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// A diagnostic issue that should be reported to users.
pub trait Diagnostic: Debug + Display {
    /// Returns an optional help message that should indicate
    /// what users need to do to resolve an issue.
    fn help(&self) -> Option<Box<dyn Display>> {
        None
    }

    /// Returns the severity of this issue.
    ///
    /// The default implementation returns [`Severity::default`].
    fn severity(&self) -> Severity {
        Default::default()
    }

    /// Emits this issue as a `tracing` event at the level of its severity.
    fn log(&self) {
        let help = self.help().map(|help| help.to_string());
        match self.severity() {
            Severity::Info => tracing::info!(issue = ?self, help, "{}", self),
            Severity::Warning => tracing::warn!(issue = ?self, help, "{}", self),
            Severity::Error => tracing::error!(issue = ?self, help, "{}", self),
        }
    }
}

/// An enumeration of possible severity levels.
#[derive(
    Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// An error. Often, but not always, fatal.
    Error,
}

/// A collection of issues.
#[derive(Debug, Clone)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> IssueSet<T> {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    /// The number of issues in this issue set.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if this issue set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Removes all issues from the set, returning them in insertion order.
    pub fn take(&mut self) -> Vec<T> {
        self.num_errors = 0;
        self.num_warnings = 0;
        std::mem::take(&mut self.issues)
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Adds the given issue to the issue set.
    #[inline]
    pub fn add(&mut self, issue: T) {
        let severity = issue.severity();
        match severity {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            _ => (),
        };
        self.issues.push(issue);
    }

    /// Logs the given issue via [`Diagnostic::log`], then adds it to the issue set.
    pub fn add_and_log(&mut self, issue: T) {
        issue.log();
        self.add(issue);
    }

    /// Returns an iterator over the issues with at least the given severity.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &T> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity() >= severity)
    }

    /// The number of errors in this issue set.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// The number of warnings in this issue set.
    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl<T: Diagnostic> Extend<T> for IssueSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for issue in iter {
            self.add(issue);
        }
    }
}

impl<T> IntoIterator for IssueSet<T> {
    type Item = T;
    type IntoIter = <std::vec::Vec<T> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl<T: Diagnostic> Display for IssueSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}: {}", issue.severity(), issue)?;
            if let Some(help) = issue.help() {
                writeln!(f, "  help: {}", help)?;
            }
        }
        Ok(())
    }
}
