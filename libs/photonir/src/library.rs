//! The component arena.

use std::collections::{HashMap, HashSet};

use arcstr::ArcStr;
use indexmap::{IndexMap, IndexSet};
use uniquify::Names;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::id::Id;

/// Marker type for component identifiers.
///
/// This is `Components` rather than [`Component`] so that the identifier does not
/// depend on the component's contents.
pub struct Components;

/// An opaque handle to a component stored in a [`Library`].
pub type ComponentId = Id<Components>;

/// An arena of finalized components.
///
/// Components reference each other by [`ComponentId`], so a component may be placed
/// many times and by many parents without being copied. The reference graph is
/// always acyclic.
#[derive(Debug, Clone)]
pub struct Library {
    component_id: ComponentId,
    components: IndexMap<ComponentId, Component>,
    name_map: HashMap<ArcStr, ComponentId>,
    names: Names<ComponentId>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            component_id: Id::new(),
            components: Default::default(),
            name_map: Default::default(),
            names: Default::default(),
        }
    }
}

impl Library {
    /// Creates an empty library.
    pub fn new() -> Self {
        Default::default()
    }

    /// Finalizes `component` and stores it in the library.
    ///
    /// A new component receives a fresh ID and a unique name derived from its own name
    /// (`MMI1x2`, `MMI1x2_1`, ...). A component previously taken out with
    /// [`checkout`](Library::checkout) replaces its old version and keeps its ID and name.
    pub fn add_component(&mut self, mut component: Component) -> Result<ComponentId> {
        let id = match component.id() {
            Some(id) if self.components.contains_key(&id) => id,
            Some(id) => return Err(Error::not_found("component", id.to_string())),
            None => self.component_id.alloc(),
        };
        for reference in component.references().values() {
            if reference.component() == id || self.reaches(reference.component(), id) {
                return Err(Error::Cycle {
                    parent: component.name().clone(),
                    child: self.component(reference.component())?.name().clone(),
                });
            }
        }
        let name = self.names.assign_name(id, component.name());
        component.finalize(id, name.clone());
        self.name_map.insert(name.clone(), id);
        tracing::debug!(%id, %name, ports = component.ports().len(), "added component");
        self.components.insert(id, component);
        Ok(id)
    }

    /// Gets the component with the given ID.
    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.components
            .get(&id)
            .ok_or_else(|| Error::not_found("component", id.to_string()))
    }

    /// Gets the component with the given name.
    pub fn component_named(&self, name: &str) -> Result<&Component> {
        self.component(self.component_id_named(name)?)
    }

    /// Gets the ID of the component with the given name.
    pub fn component_id_named(&self, name: &str) -> Result<ComponentId> {
        self.name_map
            .get(name)
            .copied()
            .ok_or_else(|| Error::not_found("component", name))
    }

    /// Returns `true` if the library contains `id`.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Returns an editable copy of a finalized component.
    ///
    /// Pass the copy back to [`add_component`](Library::add_component) to replace the stored
    /// version. References to the component elsewhere see the new version.
    pub fn checkout(&self, id: ComponentId) -> Result<Component> {
        Ok(self.component(id)?.clone())
    }

    /// Removes the named port from a finalized component.
    ///
    /// Used to suppress ports of a sub-assembly that must not propagate outward.
    pub fn remove_port(&mut self, id: ComponentId, name: &str) -> Result<crate::port::Port> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("component", id.to_string()))?;
        component.remove_port(name)
    }

    /// Iterates over the `(id, component)` pairs in this library, in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components.iter().map(|(id, component)| (*id, component))
    }

    /// The number of components in this library.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the library holds no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns component IDs in topological order: children before their parents.
    pub fn topological_order(&self) -> Vec<ComponentId> {
        let mut state = IndexSet::new();
        for (id, _) in self.components() {
            self.dfs_postorder(id, &mut state);
        }
        state.into_iter().collect()
    }

    fn dfs_postorder(&self, id: ComponentId, state: &mut IndexSet<ComponentId>) {
        if state.contains(&id) {
            return;
        }
        if let Some(component) = self.components.get(&id) {
            for reference in component.references().values() {
                self.dfs_postorder(reference.component(), state);
            }
        }
        state.insert(id);
    }

    /// Returns `true` if `to` is reachable from `from` through references.
    ///
    /// A component reaches itself.
    pub fn reaches(&self, from: ComponentId, to: ComponentId) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(component) = self.components.get(&id) {
                stack.extend(component.references().values().map(|r| r.component()));
            }
        }
        false
    }
}
