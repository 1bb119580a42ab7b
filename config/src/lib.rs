//! Layered configuration for `lnoi-forge`.
//!
//! Settings come from a `lnoi-forge.toml` file, found by walking up from the
//! working directory or given explicitly, and are then overridden by
//! `LNOI_FORGE_*` environment variables. A missing file means defaults.
#![warn(missing_docs)]

pub(crate) mod env;
pub(crate) mod paths;
#[cfg(test)]
mod tests;
mod toml;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::env::{Env, OS_ENV};

/// The name of the configuration file.
pub const CONFIG_FILE: &str = "lnoi-forge.toml";

/// Overrides [`RegressionConfig::golden_dir`].
pub const GOLDEN_DIR_VAR: &str = "LNOI_FORGE_GOLDEN_DIR";
/// Overrides [`RegressionConfig::artifact_dir`].
pub const ARTIFACT_DIR_VAR: &str = "LNOI_FORGE_ARTIFACT_DIR";
/// Overrides [`RegressionConfig::tolerance`].
pub const TOLERANCE_VAR: &str = "LNOI_FORGE_TOLERANCE";
/// Overrides [`LogConfig::filter`].
pub const LOG_VAR: &str = "LNOI_FORGE_LOG";

/// The complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Regression testing settings.
    pub regression: RegressionConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Settings for comparing generated layouts against golden layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionConfig {
    /// Accepted ratio of difference area to golden area.
    pub tolerance: f64,
    /// Directory of golden layouts.
    pub golden_dir: PathBuf,
    /// Directory receiving the layouts of failed comparisons.
    pub artifact_dir: PathBuf,
    /// Tolerances for individual component families.
    pub overrides: IndexMap<String, f64>,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            golden_dir: PathBuf::from("golden"),
            artifact_dir: PathBuf::from("target/regression"),
            overrides: IndexMap::new(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// A `tracing` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration for the working directory `cwd`.
    ///
    /// Uses the nearest `lnoi-forge.toml` in `cwd` or its ancestors, if any.
    pub fn new(cwd: impl AsRef<Path>) -> Result<Self> {
        Self::with_env(cwd.as_ref(), None, &OS_ENV)
    }

    /// Loads the configuration from an explicit file.
    pub fn from_path(cwd: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Self> {
        Self::with_env(cwd.as_ref(), Some(path.as_ref()), &OS_ENV)
    }

    /// Returns the nearest configuration file in `cwd` or its ancestors.
    pub fn find(cwd: &Path) -> Option<PathBuf> {
        paths::ancestors(cwd, None)
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|path| path.is_file())
    }

    /// Parses a configuration document.
    ///
    /// Relative directories are resolved against `base`.
    pub fn parse(toml: &str, base: &Path) -> Result<Self> {
        let mut config = crate::toml::parse_document(toml, &base.join(CONFIG_FILE))?;
        config.resolve_paths(base);
        Ok(config)
    }

    pub(crate) fn with_env(cwd: &Path, explicit: Option<&Path>, env: &dyn Env) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some(paths::resolve(cwd, path)),
            None => Self::find(cwd),
        };
        let mut config = match &file {
            Some(path) => {
                let base = path.parent().unwrap_or(cwd);
                let doc = paths::read_to_string(path)?;
                let mut config = crate::toml::parse_document(&doc, path)?;
                config.resolve_paths(base);
                config
            }
            None => {
                let mut config = Self::default();
                config.resolve_paths(cwd);
                config
            }
        };
        config.apply_env(cwd, env)?;
        tracing::debug!(file = ?file, ?config, "loaded configuration");
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.regression.golden_dir = paths::resolve(base, &self.regression.golden_dir);
        self.regression.artifact_dir = paths::resolve(base, &self.regression.artifact_dir);
    }

    fn apply_env(&mut self, cwd: &Path, env: &dyn Env) -> Result<()> {
        if let Some(dir) = env.var(GOLDEN_DIR_VAR) {
            self.regression.golden_dir = paths::resolve(cwd, Path::new(&dir));
        }
        if let Some(dir) = env.var(ARTIFACT_DIR_VAR) {
            self.regression.artifact_dir = paths::resolve(cwd, Path::new(&dir));
        }
        if let Some(tolerance) = env.var(TOLERANCE_VAR) {
            self.regression.tolerance = tolerance
                .trim()
                .parse()
                .with_context(|| format!("{TOLERANCE_VAR}=`{tolerance}` is not a number"))?;
        }
        if let Some(filter) = env.var(LOG_VAR) {
            self.log.filter = filter;
        }
        Ok(())
    }
}
