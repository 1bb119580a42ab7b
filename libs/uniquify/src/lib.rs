//! A library for assigning unique names.
//!
//! Component names are built from a prefix plus a counter (`MMI1x2`, `MMI1x2_1`, ...),
//! while port and reference names use the smallest free index of a numbered
//! sequence (`P0`, `P1`, ...).

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// A set of unique names.
///
/// Each key of type `K` is assigned a unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Names<K: Hash + Eq> {
    names: HashSet<ArcStr>,
    assignments: HashMap<K, ArcStr>,
}

impl<K: Hash + Eq> Default for Names<K> {
    fn default() -> Self {
        Self {
            names: HashSet::new(),
            assignments: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> Names<K> {
    /// Creates a new, empty name set.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the name associated with this key, if it exists.
    pub fn name(&self, id: &K) -> Option<ArcStr> {
        self.assignments.get(id).cloned()
    }

    /// Returns `true` if `name` has already been handed out.
    pub fn is_taken(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Allocates a new, unique name associated with the given ID.
    ///
    /// The name will be based on the given `base_name`. If the ID already
    /// has a name, that name is returned unchanged.
    pub fn assign_name(&mut self, id: K, base_name: &str) -> ArcStr {
        if let Some(name) = self.assignments.get(&id) {
            return name.clone();
        }
        let name = if self.names.contains(base_name) {
            let mut i = 1;
            loop {
                let new_name = arcstr::format!("{}_{}", base_name, i);
                if !self.names.contains(&new_name) {
                    break new_name;
                }
                i += 1;
            }
        } else {
            base_name.into()
        };

        self.names.insert(name.clone());
        self.assignments.insert(id, name.clone());
        name
    }
}

/// Returns the first name `{prefix}{i}`, `i = 0, 1, ...`, for which `taken` is `false`.
///
/// # Example
///
/// ```
/// let used = ["P0", "P2"];
/// let name = uniquify::first_unused("P", |name| used.contains(&name));
/// assert_eq!(name, "P1");
/// ```
pub fn first_unused(prefix: &str, taken: impl Fn(&str) -> bool) -> ArcStr {
    let mut i = 0usize;
    loop {
        let name = arcstr::format!("{}{}", prefix, i);
        if !taken(&name) {
            return name;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_prefixes_get_counters() {
        let mut names = Names::new();
        assert_eq!(names.assign_name(0u64, "MMI1x2"), "MMI1x2");
        assert_eq!(names.assign_name(1u64, "MMI1x2"), "MMI1x2_1");
        assert_eq!(names.assign_name(2u64, "MMI1x2"), "MMI1x2_2");
        assert_eq!(names.assign_name(3u64, "MMI1x2_1"), "MMI1x2_1_1");
        assert_eq!(names.name(&1), Some(arcstr::literal!("MMI1x2_1")));
        assert!(names.is_taken("MMI1x2_2"));
    }

    #[test]
    fn reassigning_an_id_keeps_its_name() {
        let mut names = Names::new();
        let first = names.assign_name("a", "BEND");
        assert_eq!(names.assign_name("a", "OTHER"), first);
        assert!(!names.is_taken("OTHER"));
    }

    #[test]
    fn first_unused_fills_gaps() {
        assert_eq!(first_unused("R", |_| false), "R0");
        assert_eq!(first_unused("P", |n| n == "P0" || n == "P1"), "P2");
    }
}
