//! Utilities for locating and reading configuration files.
//
// ## LICENSING
//
// Based on Cargo's utility functions with substantial modifications.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Returns an iterator that walks up the directory hierarchy towards the root.
///
/// Each item is a [`Path`]. It will start with the given path, finishing at
/// the root. If the `stop_root_at` parameter is given, it will stop at the
/// given path (which will be the last item).
pub(crate) fn ancestors<'a>(path: &'a Path, stop_root_at: Option<&Path>) -> PathAncestors<'a> {
    PathAncestors::new(path, stop_root_at)
}

/// An iterator over parent paths from the current directory to a certain stopping directory.
pub(crate) struct PathAncestors<'a> {
    current: Option<&'a Path>,
    stop_at: Option<PathBuf>,
}

impl<'a> PathAncestors<'a> {
    fn new(path: &'a Path, stop_root_at: Option<&Path>) -> PathAncestors<'a> {
        PathAncestors {
            current: Some(path),
            stop_at: stop_root_at.map(|p| p.to_path_buf()),
        }
    }
}

impl<'a> Iterator for PathAncestors<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<&'a Path> {
        let path = self.current?;
        self.current = path.parent();
        if self.stop_at.as_deref() == Some(path) {
            self.current = None;
        }
        Some(path)
    }
}

/// Equivalent to [`std::fs::read_to_string`] with better error messages.
pub(crate) fn read_to_string(p: impl AsRef<Path>) -> Result<String> {
    let p = p.as_ref();
    fs::read_to_string(p).with_context(|| format!("failed to read `{}`", p.display()))
}

/// Resolves `path` against `base` unless it is already absolute.
pub(crate) fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
