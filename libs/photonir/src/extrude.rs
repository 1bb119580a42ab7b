//! Turns 2D layouts into stacks of 3D solids using a technology's extrusion rules.

use geometry::prelude::*;
use geometry::region::Region;

use crate::error::Result;
use crate::layer::{MaskOperation, MaskSpec, Medium};
use crate::library::{ComponentId, Library};

/// A slab of material bounded by a 2D region and a vertical interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    /// The slab material.
    pub medium: Medium,
    /// Vertical extent `(lo, hi)`.
    pub limits: (f64, f64),
    /// Sidewall angle in degrees.
    pub sidewall_angle: f64,
    /// The footprint of the slab.
    pub region: Region,
}

/// The 3D structure of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Extruded {
    /// Solids in stacking order; later solids take precedence where they overlap.
    pub solids: Vec<Solid>,
    /// The medium filling everything else.
    pub background: Medium,
}

impl Extruded {
    /// The medium at `point` and height `z`.
    ///
    /// Sidewall angles are ignored.
    pub fn medium_at(&self, point: Point, z: f64) -> &Medium {
        self.solids
            .iter()
            .rev()
            .find(|s| s.limits.0 <= z && z <= s.limits.1 && s.region.contains_point(point))
            .map(|s| &s.medium)
            .unwrap_or(&self.background)
    }
}

/// Extrudes the component `id` with the rules of its technology.
pub fn extrude(lib: &Library, id: ComponentId) -> Result<Extruded> {
    let component = lib.component(id)?;
    let span = tracing::debug_span!("extrude", component = %component.name());
    let _guard = span.enter();

    let technology = component.technology();
    let bounds = component.bbox(lib)?;
    let mut solids = Vec::with_capacity(technology.extrusion_specs().len());
    for rule in technology.extrusion_specs() {
        let region = if rule.mask.is_bounds() {
            bounds.map(Region::from_rect).unwrap_or_default()
        } else {
            mask_region(lib, id, &rule.mask)?
        };
        if region.is_empty() {
            continue;
        }
        solids.push(Solid {
            medium: rule.medium.clone(),
            limits: rule.limits,
            sidewall_angle: rule.sidewall_angle,
            region,
        });
    }
    tracing::debug!(solids = solids.len(), "extruded component");
    Ok(Extruded {
        solids,
        background: technology.background_medium().clone(),
    })
}

fn mask_region(lib: &Library, id: ComponentId, mask: &MaskSpec) -> Result<Region> {
    let component = lib.component(id)?;
    let operand = |layers: &[crate::layer::Layer]| -> Result<Region> {
        let mut region = Region::empty();
        for layer in layers {
            let polygons = component.get_structures(lib, *layer)?;
            region = region.union(&Region::from_polygons(&polygons));
        }
        Ok(region)
    };
    let a = operand(&mask.operand1)?;
    let b = operand(&mask.operand2)?;
    Ok(match mask.operation {
        MaskOperation::Union => a.union(&b),
        MaskOperation::Difference => a.difference(&b),
        MaskOperation::Intersection => a.intersection(&b),
        MaskOperation::SymmetricDifference => a.xor(&b),
    })
}
