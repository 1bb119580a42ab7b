//! Parametric primitives shared by component libraries.

use std::sync::Arc;

use geometry::prelude::*;

use crate::component::Component;
use crate::context::Context;
use crate::error::{ensure, Error, Result};
use crate::library::ComponentId;
use crate::model::{PortSymmetry, Tidy3dModel, Tidy3dOptions};
use crate::port::Port;
use crate::port_spec::PortSpec;

/// A straight waveguide of the given cross-section from `(0, 0)` to `(length, 0)`.
///
/// Ports `P0` and `P1` sit at the two ends, facing into the waveguide.
pub fn straight(
    ctx: &mut Context,
    port_spec: &Arc<PortSpec>,
    length: f64,
    model: &Tidy3dOptions,
) -> Result<ComponentId> {
    ensure(length > 0., "length > 0")?;
    let mut component = Component::new("Straight", ctx.technology.clone());
    for (layer, mut path) in port_spec.get_paths(Point::zero()) {
        path.segment((length, 0.), None);
        component.add(layer, path)?;
    }
    component.add_port(Port::new((0., 0.), 0., port_spec.clone(), false), None)?;
    component.add_port(Port::new((length, 0.), 180., port_spec.clone(), true), None)?;
    let model = Tidy3dModel::with_options(
        vec![PortSymmetry::new("P0", "P1", [("P1", "P0")])],
        model,
    )?;
    component.add_model(model, "Tidy3D")?;
    ctx.library.add_component(component)
}

/// A linear transition between two cross-sections over `length`.
///
/// Both specifications must have the same number of profiles on the same layers,
/// which are paired in canonical order. Each strip changes width and offset linearly.
pub fn transition(
    ctx: &mut Context,
    port_spec1: &Arc<PortSpec>,
    port_spec2: &Arc<PortSpec>,
    length: f64,
    model: &Tidy3dOptions,
) -> Result<ComponentId> {
    ensure(length > 0., "length > 0")?;
    let (profiles1, profiles2) = (port_spec1.path_profiles(), port_spec2.path_profiles());
    if profiles1.len() != profiles2.len()
        || profiles1.iter().zip(profiles2).any(|(a, b)| a.layer != b.layer)
    {
        return Err(Error::invalid_parameter(
            "port_spec1 and port_spec2 have path profiles on the same layers",
        ));
    }

    let mut component = Component::new("Transition", ctx.technology.clone());
    for (a, b) in profiles1.iter().zip(profiles2) {
        let signs: &[f64] = if a.offset > 0. || b.offset > 0. {
            &[1., -1.]
        } else {
            &[1.]
        };
        for sign in signs {
            let (y1, y2) = (sign * a.offset, sign * b.offset);
            component.add(
                a.layer,
                Polygon::from_verts(vec![
                    Point::new(0., y1 - 0.5 * a.width),
                    Point::new(length, y2 - 0.5 * b.width),
                    Point::new(length, y2 + 0.5 * b.width),
                    Point::new(0., y1 + 0.5 * a.width),
                ]),
            )?;
        }
    }
    component.add_port(Port::new((0., 0.), 0., port_spec1.clone(), false), None)?;
    component.add_port(Port::new((length, 0.), 180., port_spec2.clone(), true), None)?;
    component.add_model(Tidy3dModel::with_options(Vec::new(), model)?, "Tidy3D")?;
    ctx.library.add_component(component)
}
