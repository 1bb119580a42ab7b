//! Placed instances of components.

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::library::{ComponentId, Library};
use crate::port::Port;

/// A placed instance of a component inside another component.
///
/// The transformation is always rigid; it is changed only through
/// [`translate`](Reference::translate), [`rotate`](Reference::rotate),
/// [`mirror`](Reference::mirror) and [`connect`](Reference::connect).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    component: ComponentId,
    transformation: Transformation,
}

impl From<ComponentId> for Reference {
    fn from(value: ComponentId) -> Self {
        Self::new(value)
    }
}

impl Reference {
    /// Creates a reference to `component` placed at the origin.
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            transformation: Transformation::identity(),
        }
    }

    /// Creates a reference to `component` translated by `origin`.
    pub fn at(component: ComponentId, origin: impl Into<Point>) -> Self {
        Self {
            component,
            transformation: Transformation::from_offset(origin.into()),
        }
    }

    /// The referenced component.
    #[inline]
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// The placement of the referenced component in its parent.
    #[inline]
    pub fn transformation(&self) -> Transformation {
        self.transformation
    }

    /// Translates the reference by `offset`.
    pub fn translate(&mut self, offset: impl Into<Point>) -> &mut Self {
        let offset = offset.into();
        self.transformation = Transformation::cascade(
            Transformation::translate(offset.x, offset.y),
            self.transformation,
        );
        self
    }

    /// Rotates the reference counterclockwise by `angle` degrees about `center`.
    pub fn rotate(&mut self, angle: f64, center: impl Into<Point>) -> &mut Self {
        self.transformation = Transformation::cascade(
            Transformation::rotate_about(angle, center.into()),
            self.transformation,
        );
        self
    }

    /// Mirrors the reference about the parent's x-axis.
    pub fn mirror(&mut self) -> &mut Self {
        self.transformation =
            Transformation::cascade(Transformation::reflect_vert(), self.transformation);
        self
    }

    /// Places this reference so that its port `port` meets `target`.
    ///
    /// After connecting, the transformed port sits at `target`'s position facing the
    /// opposite direction. The rotation is applied about the port's current placed
    /// position, so a second call re-anchors from the current placement rather than
    /// from the identity. Reflections already applied are kept.
    ///
    /// Cross-section compatibility is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the referenced component has no port named `port`.
    pub fn connect(&mut self, lib: &Library, port: &str, target: &Port) -> Result<&mut Self> {
        let local = lib.component(self.component)?.port(port)?.clone();
        let placed = local.transform(self.transformation);
        let rotation = target.angle() + 180. - placed.angle();
        let rotated = Transformation::cascade(
            Transformation::rotate_about(rotation, placed.center()),
            self.transformation,
        );
        let landed = rotated.apply(local_center(lib, self.component, port)?);
        let shift = target.center() - landed;
        self.transformation = Transformation::cascade(
            Transformation::translate(shift.x, shift.y),
            rotated,
        );
        tracing::debug!(
            component = %self.component,
            port,
            x = target.center().x,
            y = target.center().y,
            angle = target.angle(),
            "connected reference"
        );
        Ok(self)
    }

    /// The named port of the referenced component, placed by this reference.
    pub fn port(&self, lib: &Library, name: &str) -> Result<Port> {
        Ok(lib
            .component(self.component)?
            .port(name)?
            .clone()
            .transform(self.transformation))
    }

    /// All ports of the referenced component, placed by this reference.
    pub fn ports(&self, lib: &Library) -> Result<IndexMap<ArcStr, Port>> {
        Ok(lib
            .component(self.component)?
            .ports()
            .iter()
            .map(|(name, port)| (name.clone(), port.clone().transform(self.transformation)))
            .collect())
    }
}

fn local_center(lib: &Library, component: ComponentId, port: &str) -> Result<Point> {
    lib.component(component)?
        .ports()
        .get(port)
        .map(Port::center)
        .ok_or_else(|| Error::not_found("port", port))
}
