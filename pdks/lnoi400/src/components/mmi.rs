//! Multimode interference couplers.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::*;
use photonir::error::ensure;
use photonir::{
    Component, ComponentId, Context, Error, Port, PortSpec, PortSymmetry, Result, Tidy3dModel,
    Tidy3dOptions,
};
use serde::{Deserialize, Serialize};

use crate::generator::{
    check_technology, component_name, warn_geometry, Argument, Generator, PortSpecRef,
};

/// Parameters of [`Mmi1x2`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Mmi1x2Params {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Width of the MMI section.
    pub width: f64,
    /// Length of the MMI section.
    pub length: f64,
    /// Width of the tapers at the MMI section.
    pub taper_width: f64,
    /// Length of the tapers.
    pub taper_length: f64,
    /// Distance between the output waveguides relative to the MMI width.
    pub port_ratio: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for Mmi1x2Params {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            width: 6.,
            length: 26.75,
            taper_width: 1.5,
            taper_length: 25.,
            port_ratio: 0.55,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// Parameters of [`Mmi2x2`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Mmi2x2Params {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Width of the MMI section.
    pub width: f64,
    /// Length of the MMI section.
    pub length: f64,
    /// Width of the tapers at the MMI section.
    pub taper_width: f64,
    /// Length of the tapers.
    pub taper_length: f64,
    /// Distance between the waveguides on each side relative to the MMI width.
    pub port_ratio: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for Mmi2x2Params {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            width: 5.,
            length: 76.5,
            taper_width: 1.5,
            taper_length: 25.,
            port_ratio: 0.7,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// An MMI with one port on the left and two on the right.
///
/// Ports: `P0` input, `P1` lower output, `P2` upper output.
pub struct Mmi1x2;

/// An MMI with two ports on each side.
///
/// Ports: `P0` lower input, `P1` upper input, `P2` lower output, `P3` upper output.
pub struct Mmi2x2;

fn mmi_arguments() -> Vec<Argument> {
    vec![
        Argument::port_spec("port_spec", "Port specification describing waveguide cross-section."),
        Argument::length("width", "Width of the MMI section."),
        Argument::length("length", "Length of the MMI section."),
        Argument::length("taper_width", "Width of the taper."),
        Argument::length("taper_length", "Length of the taper."),
        Argument::fraction(
            "port_ratio",
            "Ratio of the distance between the waveguides and the MMI width.",
        ),
        Argument::technology(),
        Argument::name(),
    ]
}

struct MmiGeometry {
    spec: Arc<PortSpec>,
    width: f64,
    length: f64,
    taper_width: f64,
    taper_length: f64,
    port_ratio: f64,
}

impl MmiGeometry {
    /// Validates the geometry, warning about overlapping tapers.
    fn check<G: Generator>(&self, ctx: &mut Context) -> Result<()> {
        ensure(self.width > 0., "width > 0")?;
        ensure(self.length > 0., "length > 0")?;
        ensure(self.taper_width > 0., "taper_width > 0")?;
        ensure(self.taper_length > 0., "taper_length > 0")?;
        ensure(
            self.port_ratio * self.width + self.taper_width <= self.width,
            "port_ratio * width + taper_width ≤ width",
        )?;
        if self.port_ratio * self.width < self.taper_width {
            warn_geometry::<G>(ctx, "Waveguide tapers will overlap.");
        }
        Ok(())
    }

    fn offset(&self) -> f64 {
        0.5 * self.width * self.port_ratio
    }

    /// Draws the MMI section and the tapers at the given lateral positions.
    ///
    /// Inputs taper from `(-taper_length, y)` to `(0, y)`; outputs from
    /// `(length + taper_length, y)` to `(length, y)`.
    fn draw(&self, component: &mut Component, inputs: &[f64], outputs: &[f64]) -> Result<()> {
        let (core, clad) = match (self.spec.core(), self.spec.cladding()) {
            (Some(core), Some(clad)) => (*core, *clad),
            _ => {
                return Err(Error::invalid_parameter(
                    "port_spec has a path profile with offset 0",
                ))
            }
        };
        let margin = 0.5 * (clad.width - core.width);
        let half = 0.5 * self.width;
        component.add(
            core.layer,
            Rect::from_sides(0., -half, self.length, half),
        )?;
        component.add(
            clad.layer,
            Rect::from_sides(0., -half - margin, self.length, half + margin),
        )?;

        let x = self.length + self.taper_length;
        let tapers = inputs
            .iter()
            .map(|&y| ((-self.taper_length, y), (0., y)))
            .chain(outputs.iter().map(|&y| ((x, y), (self.length, y))));
        for (start, end) in tapers {
            for (layer, mut path) in self.spec.get_paths(start.into()) {
                let width = (layer == core.layer).then_some(self.taper_width);
                path.segment(end, width);
                component.add(layer, path)?;
            }
        }
        Ok(())
    }

    fn model(&self, options: &Tidy3dOptions) -> Result<Tidy3dModel> {
        Tidy3dModel::with_options(
            vec![PortSymmetry::new("P1", "P2", [("P0", "P0"), ("P2", "P1")])],
            options,
        )
    }
}

impl Generator for Mmi1x2 {
    type Params = Mmi1x2Params;
    const FUNCTION: &'static str = "mmi1x2";
    const NAME_PREFIX: &'static str = "MMI1x2";

    fn arguments() -> Vec<Argument> {
        mmi_arguments()
    }

    fn generate(ctx: &mut Context, params: &Mmi1x2Params) -> Result<ComponentId> {
        let geometry = MmiGeometry {
            spec: params.port_spec.resolve(&ctx.technology)?,
            width: params.width,
            length: params.length,
            taper_width: params.taper_width,
            taper_length: params.taper_length,
            port_ratio: params.port_ratio,
        };
        geometry.check::<Self>(ctx)?;
        check_technology(ctx);

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        let offset = geometry.offset();
        geometry.draw(&mut c, &[0.], &[-offset, offset])?;

        let x = geometry.length + geometry.taper_length;
        let spec = &geometry.spec;
        c.add_port(Port::new((-geometry.taper_length, 0.), 0., spec.clone(), false), None)?;
        c.add_port(Port::new((x, -offset), 180., spec.clone(), true), None)?;
        c.add_port(Port::new((x, offset), 180., spec.clone(), true), None)?;
        c.add_model(geometry.model(&params.tidy3d_model)?, "Tidy3D")?;
        ctx.library.add_component(c)
    }
}

impl Generator for Mmi2x2 {
    type Params = Mmi2x2Params;
    const FUNCTION: &'static str = "mmi2x2";
    const NAME_PREFIX: &'static str = "MMI2x2";

    fn arguments() -> Vec<Argument> {
        mmi_arguments()
    }

    fn generate(ctx: &mut Context, params: &Mmi2x2Params) -> Result<ComponentId> {
        let geometry = MmiGeometry {
            spec: params.port_spec.resolve(&ctx.technology)?,
            width: params.width,
            length: params.length,
            taper_width: params.taper_width,
            taper_length: params.taper_length,
            port_ratio: params.port_ratio,
        };
        geometry.check::<Self>(ctx)?;
        check_technology(ctx);

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        let offset = geometry.offset();
        geometry.draw(&mut c, &[-offset, offset], &[-offset, offset])?;

        let x = geometry.length + geometry.taper_length;
        let spec = &geometry.spec;
        for y in [-offset, offset] {
            c.add_port(Port::new((-geometry.taper_length, y), 0., spec.clone(), false), None)?;
        }
        for y in [-offset, offset] {
            c.add_port(Port::new((x, y), 180., spec.clone(), true), None)?;
        }
        c.add_model(geometry.model(&params.tidy3d_model)?, "Tidy3D")?;
        ctx.library.add_component(c)
    }
}

/// Builds a 1×2 MMI. See [`Mmi1x2`].
pub fn mmi1x2(ctx: &mut Context, params: &Mmi1x2Params) -> Result<ComponentId> {
    Mmi1x2::generate(ctx, params)
}

/// Builds a 2×2 MMI. See [`Mmi2x2`].
pub fn mmi2x2(ctx: &mut Context, params: &Mmi2x2Params) -> Result<ComponentId> {
    Mmi2x2::generate(ctx, params)
}
