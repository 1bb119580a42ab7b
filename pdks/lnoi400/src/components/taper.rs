//! Edge couplers.

use arcstr::ArcStr;
use geometry::prelude::*;
use photonir::error::ensure;
use photonir::{Component, ComponentId, Context, Port, Result, Tidy3dModel, Tidy3dOptions};
use serde::{Deserialize, Serialize};

use crate::generator::{
    check_technology, component_name, core_width, Argument, Generator, PortSpecRef,
};
use crate::layers::{LN_RIB, LN_STRIP};

/// Parameters of [`DoubleLinearInverseTaper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoubleLinearInverseTaperParams {
    /// Cross-section at the chip facet.
    pub start_port_spec: PortSpecRef,
    /// Cross-section of the routing waveguide.
    pub end_port_spec: PortSpecRef,
    /// Width of the lower taper at the end of its linear section.
    pub lower_taper_end_width: f64,
    /// Length of the lower taper section.
    pub lower_taper_length: f64,
    /// Width of the upper taper tip.
    pub upper_taper_start_width: f64,
    /// Length of the upper taper.
    pub upper_taper_length: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for DoubleLinearInverseTaperParams {
    fn default() -> Self {
        Self {
            start_port_spec: "SWG250".into(),
            end_port_spec: "RWG1000".into(),
            lower_taper_end_width: 2.05,
            lower_taper_length: 120.,
            upper_taper_start_width: 0.25,
            upper_taper_length: 240.,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// A dual layer inverse taper for coupling to a lensed fiber.
///
/// A slab taper on `LN_RIB` runs over the full length, widening at the slope
/// of its first `lower_taper_length`; a ridge taper on `LN_STRIP` follows it.
pub struct DoubleLinearInverseTaper;

impl Generator for DoubleLinearInverseTaper {
    type Params = DoubleLinearInverseTaperParams;
    const FUNCTION: &'static str = "double_linear_inverse_taper";
    const NAME_PREFIX: &'static str = "EDGE_COUPLER_LIN_LIN";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::port_spec(
                "start_port_spec",
                "Port specification describing the waveguide cross-section at the chip facet.",
            ),
            Argument::port_spec(
                "end_port_spec",
                "Port specification describing the routing waveguide cross-section.",
            ),
            Argument::length("lower_taper_end_width", "Width of the lower taper at its end."),
            Argument::length("lower_taper_length", "Length of the lower taper section."),
            Argument::length("upper_taper_start_width", "Width of the upper taper tip."),
            Argument::length("upper_taper_length", "Length of the upper taper section."),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(
        ctx: &mut Context,
        params: &DoubleLinearInverseTaperParams,
    ) -> Result<ComponentId> {
        ensure(params.lower_taper_length > 0., "lower_taper_length > 0")?;
        ensure(params.upper_taper_length > 0., "upper_taper_length > 0")?;
        ensure(params.upper_taper_start_width > 0., "upper_taper_start_width > 0")?;
        check_technology(ctx);
        let start_spec = params.start_port_spec.resolve(&ctx.technology)?;
        let end_spec = params.end_port_spec.resolve(&ctx.technology)?;

        let lower_start_width = core_width(&start_spec)?;
        let upper_end_width = core_width(&end_spec)?;
        let length = params.lower_taper_length + params.upper_taper_length;
        let slope = (params.lower_taper_end_width - lower_start_width) / params.lower_taper_length;
        let lower_end_width = lower_start_width + slope * length;

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        c.add(
            LN_STRIP,
            Polygon::linear_taper(
                params.upper_taper_length,
                (params.upper_taper_start_width, upper_end_width),
            )
            .translate(Point::new(params.lower_taper_length, 0.)),
        )?;
        c.add(
            LN_RIB,
            Polygon::linear_taper(length, (lower_start_width, lower_end_width)),
        )?;
        c.add_port(Port::new((0., 0.), 0., start_spec, false), None)?;
        c.add_port(Port::new((length, 0.), 180., end_spec, true), None)?;
        c.add_model(
            Tidy3dModel::with_options(Vec::new(), &params.tidy3d_model)?,
            "Tidy3D",
        )?;
        ctx.library.add_component(c)
    }
}

/// Builds an edge coupler. See [`DoubleLinearInverseTaper`].
pub fn double_linear_inverse_taper(
    ctx: &mut Context,
    params: &DoubleLinearInverseTaperParams,
) -> Result<ComponentId> {
    DoubleLinearInverseTaper::generate(ctx, params)
}
