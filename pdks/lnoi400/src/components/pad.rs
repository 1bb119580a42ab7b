//! RF probe pads.

use arcstr::ArcStr;
use geometry::prelude::*;
use photonir::error::ensure;
use photonir::{Component, ComponentId, Context, Error, Port, Result};
use serde::{Deserialize, Serialize};

use crate::generator::{check_technology, component_name, Argument, Generator, PortSpecRef};

/// Parameters of [`CpwProbePadLinear`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpwProbePadLinearParams {
    /// Coplanar waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Width of the central conductor at the pad.
    pub pad_width: f64,
    /// Length of the straight section at the pad.
    pub length_straight: f64,
    /// Length of the tapered section.
    pub length_tapered: f64,
    /// Component name.
    pub name: Option<ArcStr>,
}

impl Default for CpwProbePadLinearParams {
    fn default() -> Self {
        Self {
            port_spec: "UniCPW".into(),
            pad_width: 80.,
            length_straight: 30.,
            length_tapered: 100.,
            name: None,
        }
    }
}

/// A ground-signal-ground probe pad tapering linearly into a coplanar waveguide.
///
/// The pad is scaled up from the CPW cross-section by `pad_width / central_width`
/// while the outer edge of the grounds stays fixed. Its only port, `P0`, is at
/// `(length_straight + length_tapered, 0)`.
pub struct CpwProbePadLinear;

impl Generator for CpwProbePadLinear {
    type Params = CpwProbePadLinearParams;
    const FUNCTION: &'static str = "cpw_probe_pad_linear";
    const NAME_PREFIX: &'static str = "GSG_PAD_LINEAR";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::port_spec(
                "port_spec",
                "Port specification for the CPW transmission line.",
            ),
            Argument::length("pad_width", "Width of the central conductor on the pad side."),
            Argument::length(
                "length_straight",
                "Length of the straight section of the taper on the pad side.",
            ),
            Argument::length("length_tapered", "Length of the tapered section."),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(ctx: &mut Context, params: &CpwProbePadLinearParams) -> Result<ComponentId> {
        ensure(params.pad_width > 0., "pad_width > 0")?;
        ensure(params.length_straight >= 0., "length_straight ≥ 0")?;
        ensure(params.length_tapered > 0., "length_tapered > 0")?;
        check_technology(ctx);
        let spec = params.port_spec.resolve(&ctx.technology)?;
        let cpw = spec.cpw_info()?;

        let scaling = params.pad_width / cpw.central_width;
        let y_max = cpw.offset + 0.5 * cpw.ground_width;
        let y_gnd = cpw.offset - 0.5 * cpw.ground_width;
        let y_sig = 0.5 * cpw.central_width;
        let x_straight = params.length_straight;
        let length = params.length_straight + params.length_tapered;

        if scaling * y_gnd >= y_max {
            return Err(Error::invalid_parameter(format!(
                "pad_width < {}",
                y_max / y_gnd * cpw.central_width
            )));
        }

        let signal = Polygon::from_verts(vec![
            Point::new(0., -scaling * y_sig),
            Point::new(x_straight, -scaling * y_sig),
            Point::new(length, -y_sig),
            Point::new(length, y_sig),
            Point::new(x_straight, scaling * y_sig),
            Point::new(0., scaling * y_sig),
        ]);
        let ground: Vec<Point> = vec![
            Point::new(0., scaling * y_gnd),
            Point::new(x_straight, scaling * y_gnd),
            Point::new(length, y_gnd),
            Point::new(length, y_max),
            Point::new(0., y_max),
        ];
        let mirrored = ground.iter().map(|p| Point::new(p.x, -p.y)).collect();

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        c.add_all(
            cpw.layer,
            [
                signal,
                Polygon::from_verts(ground),
                Polygon::from_verts(mirrored),
            ],
        )?;
        c.add_port(Port::new((length, 0.), 180., spec, true), None)?;
        ctx.library.add_component(c)
    }
}

/// Builds a probe pad. See [`CpwProbePadLinear`].
pub fn cpw_probe_pad_linear(
    ctx: &mut Context,
    params: &CpwProbePadLinearParams,
) -> Result<ComponentId> {
    CpwProbePadLinear::generate(ctx, params)
}
