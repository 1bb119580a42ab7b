//! Lower-level utilities for mocking the process environment.

/// Permits parameterizing configuration loading over the process environment.
pub(crate) trait Env {
    /// Gets an environment variable, ignoring unset, empty and non-UTF-8 values.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
pub(crate) struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// The current OS context.
pub(crate) const OS_ENV: OsEnv = OsEnv;

#[cfg(test)]
impl Env for std::collections::HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
