//! Components: named containers of layered geometry, ports, references and models.

use std::collections::BTreeSet;
use std::sync::Arc;

use arcstr::ArcStr;
use geometry::bbox::bounding_union;
use geometry::prelude::*;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::layer::{Layer, LayerRef};
use crate::layout::FlatLayout;
use crate::library::{ComponentId, Library};
use crate::model::Model;
use crate::port::Port;
use crate::reference::Reference;
use crate::technology::Technology;

/// A named container of per-layer geometry, ports, references and models.
///
/// A component is built up with `add*` calls and then finalized by
/// [`Library::add_component`], after which it can be referenced by other components.
#[derive(Debug, Clone)]
pub struct Component {
    name: ArcStr,
    id: Option<ComponentId>,
    technology: Arc<Technology>,
    structures: IndexMap<Layer, Vec<Shape>>,
    ports: IndexMap<ArcStr, Port>,
    references: IndexMap<ArcStr, Reference>,
    models: IndexMap<ArcStr, Model>,
}

impl Component {
    /// Creates an empty component built under `technology`.
    pub fn new(name: impl Into<ArcStr>, technology: Arc<Technology>) -> Self {
        Self {
            name: name.into(),
            id: None,
            technology,
            structures: IndexMap::new(),
            ports: IndexMap::new(),
            references: IndexMap::new(),
            models: IndexMap::new(),
        }
    }

    pub(crate) fn finalize(&mut self, id: ComponentId, name: ArcStr) {
        self.id = Some(id);
        self.name = name;
    }

    /// The component name.
    ///
    /// Finalized components carry the unique name assigned by their library.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The library ID, if this component has been finalized.
    #[inline]
    pub fn id(&self) -> Option<ComponentId> {
        self.id
    }

    /// The technology this component was built under.
    #[inline]
    pub fn technology(&self) -> &Arc<Technology> {
        &self.technology
    }

    /// Appends a shape to a layer.
    ///
    /// The layer must be declared by the component's technology.
    /// Shapes may overlap each other.
    pub fn add(&mut self, layer: impl Into<LayerRef>, shape: impl Into<Shape>) -> Result<&mut Self> {
        let layer = self.technology.resolve_layer(&layer.into())?;
        self.structures.entry(layer).or_default().push(shape.into());
        Ok(self)
    }

    /// Appends several shapes to a layer.
    pub fn add_all<S: Into<Shape>>(
        &mut self,
        layer: impl Into<LayerRef>,
        shapes: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self> {
        let layer = self.technology.resolve_layer(&layer.into())?;
        self.structures
            .entry(layer)
            .or_default()
            .extend(shapes.into_iter().map(Into::into));
        Ok(self)
    }

    /// The shapes drawn directly in this component, per layer.
    #[inline]
    pub fn structures(&self) -> &IndexMap<Layer, Vec<Shape>> {
        &self.structures
    }

    /// Registers a port, returning its name.
    ///
    /// Without an explicit name, the port is called `P<n>` for the smallest unused `n`.
    pub fn add_port(&mut self, port: Port, name: Option<&str>) -> Result<ArcStr> {
        let name = match name {
            Some(name) if self.ports.contains_key(name) => {
                return Err(Error::duplicate("port", name));
            }
            Some(name) => ArcStr::from(name),
            None => uniquify::first_unused("P", |name| self.ports.contains_key(name)),
        };
        self.ports.insert(name.clone(), port);
        Ok(name)
    }

    /// Removes a port, returning it.
    pub fn remove_port(&mut self, name: &str) -> Result<Port> {
        self.ports
            .shift_remove(name)
            .ok_or_else(|| Error::not_found("port", name))
    }

    /// Gets the named port.
    pub fn port(&self, name: &str) -> Result<&Port> {
        self.ports
            .get(name)
            .ok_or_else(|| Error::not_found("port", name))
    }

    /// The ports of this component, in registration order.
    #[inline]
    pub fn ports(&self) -> &IndexMap<ArcStr, Port> {
        &self.ports
    }

    /// Adds a reference named `R<n>` and returns it for further placement.
    ///
    /// See [`add_reference_named`](Component::add_reference_named).
    pub fn add_reference(
        &mut self,
        lib: &Library,
        reference: impl Into<Reference>,
    ) -> Result<&mut Reference> {
        let name = uniquify::first_unused("R", |name| self.references.contains_key(name));
        self.add_reference_named(lib, reference, &name)
    }

    /// Adds a named reference and returns it for further placement.
    ///
    /// Fails if the referenced component is not in `lib`, if the name is taken, or if the
    /// referenced component contains this one.
    pub fn add_reference_named(
        &mut self,
        lib: &Library,
        reference: impl Into<Reference>,
        name: &str,
    ) -> Result<&mut Reference> {
        let reference = reference.into();
        let child = reference.component();
        let child_name = lib.component(child)?.name().clone();
        if let Some(id) = self.id {
            if lib.reaches(child, id) {
                return Err(Error::Cycle {
                    parent: self.name.clone(),
                    child: child_name,
                });
            }
        }
        if self.references.contains_key(name) {
            return Err(Error::duplicate("reference", name));
        }
        tracing::debug!(parent = %self.name, child = %child_name, name, "added reference");
        let entry = self.references.entry(ArcStr::from(name));
        Ok(entry.or_insert(reference))
    }

    /// Gets the named reference.
    pub fn reference(&self, name: &str) -> Result<&Reference> {
        self.references
            .get(name)
            .ok_or_else(|| Error::not_found("reference", name))
    }

    /// The references held by this component.
    #[inline]
    pub fn references(&self) -> &IndexMap<ArcStr, Reference> {
        &self.references
    }

    /// Attaches a model under `name`.
    ///
    /// Every port the model refers to must already exist on this component.
    pub fn add_model(&mut self, model: impl Into<Model>, name: &str) -> Result<&mut Self> {
        if self.models.contains_key(name) {
            return Err(Error::duplicate("model", name));
        }
        let model = model.into();
        if let Some(port) = model
            .port_names()
            .into_iter()
            .find(|port| !self.ports.contains_key(port.as_str()))
        {
            return Err(Error::not_found("port", port.clone()));
        }
        self.models.insert(ArcStr::from(name), model);
        Ok(self)
    }

    /// The models attached to this component.
    #[inline]
    pub fn models(&self) -> &IndexMap<ArcStr, Model> {
        &self.models
    }

    /// The layers used by this component.
    ///
    /// With `include_dependencies`, layers used by referenced components
    /// (recursively) are included.
    pub fn layers(&self, lib: &Library, include_dependencies: bool) -> Result<BTreeSet<Layer>> {
        let mut layers: BTreeSet<Layer> = self
            .structures
            .iter()
            .filter(|(_, shapes)| !shapes.is_empty())
            .map(|(layer, _)| *layer)
            .collect();
        if include_dependencies {
            for reference in self.references.values() {
                layers.extend(lib.component(reference.component())?.layers(lib, true)?);
            }
        }
        Ok(layers)
    }

    /// All polygons on `layer`, including those of referenced components,
    /// transformed into this component's coordinates.
    pub fn get_structures(&self, lib: &Library, layer: Layer) -> Result<Vec<Polygon>> {
        let mut polygons = Vec::new();
        self.collect_structures(lib, layer, Transformation::identity(), &mut polygons)?;
        Ok(polygons)
    }

    fn collect_structures(
        &self,
        lib: &Library,
        layer: Layer,
        trans: Transformation,
        out: &mut Vec<Polygon>,
    ) -> Result<()> {
        if let Some(shapes) = self.structures.get(&layer) {
            out.extend(shapes.iter().map(|s| s.to_polygon().transform(trans)));
        }
        for reference in self.references.values() {
            lib.component(reference.component())?.collect_structures(
                lib,
                layer,
                Transformation::cascade(trans, reference.transformation()),
                out,
            )?;
        }
        Ok(())
    }

    /// The bounding box of all geometry, including referenced components.
    pub fn bbox(&self, lib: &Library) -> Result<Option<Rect>> {
        let mut bbox = self.structures.values().flatten().fold(None, |acc, shape| {
            bounding_union(acc, shape.bbox())
        });
        for reference in self.references.values() {
            let child = lib.component(reference.component())?;
            if let Some(rect) = child.bbox(lib)? {
                let placed = rect
                    .to_polygon()
                    .transform(reference.transformation())
                    .bbox();
                bbox = bounding_union(bbox, placed);
            }
        }
        Ok(bbox)
    }

    /// Flattens this component into a single-level layout.
    pub fn flatten(&self, lib: &Library) -> Result<FlatLayout> {
        let span = tracing::debug_span!("flatten", component = %self.name);
        let _guard = span.enter();
        let mut layers = Vec::new();
        for layer in self.layers(lib, true)? {
            layers.push((layer, self.get_structures(lib, layer)?));
        }
        Ok(FlatLayout::new(self.name.clone(), layers))
    }
}
