//! Waveguide bends.

use arcstr::ArcStr;
use geometry::prelude::*;
use photonir::error::ensure;
use photonir::{
    Component, ComponentId, Context, Port, PortSymmetry, Result, Tidy3dModel,
    Tidy3dOptions,
};
use serde::{Deserialize, Serialize};

use crate::generator::{
    check_technology, component_name, warn_geometry, Argument, Generator, PortSpecRef,
};

/// Largest ratio of vertical offset to horizontal extent of a well-behaved S bend.
pub const MAX_S_BEND_RATIO: f64 = 0.285714;

/// Parameters of [`SBendVert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SBendVertParams {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Horizontal extent of the bend.
    pub h_extent: f64,
    /// Vertical offset between the ports.
    pub v_offset: f64,
    /// Length of the straight sections at each end.
    pub dx_straight: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for SBendVertParams {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            h_extent: 100.,
            v_offset: 25.,
            dx_straight: 5.,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// A Bezier S bend shifting the waveguide vertically.
///
/// `P0` sits at the origin and `P1` at `(h_extent + 2 * dx_straight, v_offset)`.
pub struct SBendVert;

impl Generator for SBendVert {
    type Params = SBendVertParams;
    const FUNCTION: &'static str = "s_bend_vert";
    const NAME_PREFIX: &'static str = "SBEND";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::port_spec(
                "port_spec",
                "Port specification describing waveguide cross-section.",
            ),
            Argument::length("h_extent", "Horizontal extent of the S bend."),
            Argument::offset("v_offset", "Vertical offset of the S bend."),
            Argument::length(
                "dx_straight",
                "Length of straight waveguide sections at the bend ends.",
            ),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(ctx: &mut Context, params: &SBendVertParams) -> Result<ComponentId> {
        let h = params.h_extent.abs();
        let v = params.v_offset;
        let dx = params.dx_straight.abs();
        ensure(h > 0., "|h_extent| > 0")?;
        if v.abs() / h > MAX_S_BEND_RATIO {
            warn_geometry::<Self>(
                ctx,
                "S bend might be too tight. Make sure the geometry is correct.",
            );
        }
        check_technology(ctx);
        let spec = params.port_spec.resolve(&ctx.technology)?;

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        for (layer, mut path) in spec.get_paths(Point::zero()) {
            if dx > 0. {
                path.segment((dx, 0.), None);
            }
            path.bezier(
                &[
                    Point::new(h / 3., 0.),
                    Point::new(2. * h / 3., v),
                    Point::new(h, v),
                ],
                true,
            );
            if dx > 0. {
                path.segment((h + 2. * dx, v), None);
            }
            c.add(layer, path)?;
        }
        c.add_port(Port::new((0., 0.), 0., spec.clone(), false), None)?;
        c.add_port(Port::new((h + 2. * dx, v), 180., spec, true), None)?;
        c.add_model(reciprocal_model(&params.tidy3d_model)?, "Tidy3D")?;
        ctx.library.add_component(c)
    }
}

/// Parameters of [`UTurnBend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UTurnBendParams {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Vertical offset between the ports, twice the bend radius.
    pub v_offset: f64,
    /// Fraction of the bend with linearly varying curvature.
    pub euler_fraction: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for UTurnBendParams {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            v_offset: 80.,
            euler_fraction: 1.,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// Parameters of [`UBendRacetrack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UBendRacetrackParams {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Vertical offset between the ports, twice the bend radius.
    pub v_offset: f64,
    /// Fraction of the bend with linearly varying curvature.
    pub euler_fraction: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for UBendRacetrackParams {
    fn default() -> Self {
        Self {
            port_spec: "RWG3000".into(),
            v_offset: 90.,
            euler_fraction: 1.,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// A 180° bend from `P0` at the origin to `P1` at `(0, v_offset)`.
pub struct UTurnBend;

/// A 180° bend on the multimode cross-section, for racetrack resonators.
pub struct UBendRacetrack;

fn u_bend_arguments() -> Vec<Argument> {
    vec![
        Argument::port_spec(
            "port_spec",
            "Port specification describing waveguide cross-section.",
        ),
        Argument::offset("v_offset", "Vertical offset of the U-turn."),
        Argument::fraction(
            "euler_fraction",
            "Fraction of the bend that is created using an Euler spiral.",
        ),
        Argument::technology(),
        Argument::name(),
    ]
}

fn u_bend<G: Generator>(
    ctx: &mut Context,
    name: &Option<ArcStr>,
    spec: &PortSpecRef,
    v_offset: f64,
    euler_fraction: f64,
    options: &Tidy3dOptions,
) -> Result<ComponentId> {
    ensure(v_offset != 0., "|v_offset| > 0")?;
    ensure(
        (0. ..=1.).contains(&euler_fraction),
        "0 ≤ euler_fraction ≤ 1",
    )?;
    check_technology(ctx);
    let spec = spec.resolve(&ctx.technology)?;

    let endpoint = Point::new(0., v_offset);
    let radius = 0.5 * v_offset.abs();
    let (a0, a1) = if v_offset > 0. { (-90., 90.) } else { (90., -90.) };
    let mut c = Component::new(component_name::<G>(name), ctx.technology.clone());
    for (layer, mut path) in spec.get_paths(Point::zero()) {
        path.arc(a0, a1, radius, euler_fraction, Some(endpoint));
        c.add(layer, path)?;
    }
    c.add_port(Port::new((0., 0.), 0., spec.clone(), false), None)?;
    c.add_port(Port::new(endpoint, 0., spec, true), None)?;
    c.add_model(reciprocal_model(options)?, "Tidy3D")?;
    ctx.library.add_component(c)
}

impl Generator for UTurnBend {
    type Params = UTurnBendParams;
    const FUNCTION: &'static str = "u_turn_bend";
    const NAME_PREFIX: &'static str = "UBEND";

    fn arguments() -> Vec<Argument> {
        u_bend_arguments()
    }

    fn generate(ctx: &mut Context, params: &UTurnBendParams) -> Result<ComponentId> {
        u_bend::<Self>(
            ctx,
            &params.name,
            &params.port_spec,
            params.v_offset,
            params.euler_fraction,
            &params.tidy3d_model,
        )
    }
}

impl Generator for UBendRacetrack {
    type Params = UBendRacetrackParams;
    const FUNCTION: &'static str = "u_bend_racetrack";
    const NAME_PREFIX: &'static str = "UBEND_RACETRACK";

    fn arguments() -> Vec<Argument> {
        u_bend_arguments()
    }

    fn generate(ctx: &mut Context, params: &UBendRacetrackParams) -> Result<ComponentId> {
        u_bend::<Self>(
            ctx,
            &params.name,
            &params.port_spec,
            params.v_offset,
            params.euler_fraction,
            &params.tidy3d_model,
        )
    }
}

/// Parameters of [`LTurnBend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LTurnBendParams {
    /// Waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Horizontal and vertical extent of the bend.
    pub effective_radius: f64,
    /// Fraction of the bend with linearly varying curvature.
    pub euler_fraction: f64,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub tidy3d_model: Tidy3dOptions,
}

impl Default for LTurnBendParams {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            effective_radius: 80.,
            euler_fraction: 1.,
            name: None,
            tidy3d_model: Tidy3dOptions::default(),
        }
    }
}

/// A 90° counterclockwise bend from `P0` at the origin to `P1` at
/// `(effective_radius, effective_radius)`.
pub struct LTurnBend;

impl Generator for LTurnBend {
    type Params = LTurnBendParams;
    const FUNCTION: &'static str = "l_turn_bend";
    const NAME_PREFIX: &'static str = "LBEND";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::port_spec(
                "port_spec",
                "Port specification describing waveguide cross-section.",
            ),
            Argument::length("effective_radius", "Effective radius of the bend."),
            Argument::fraction(
                "euler_fraction",
                "Fraction of the bend that is created using an Euler spiral.",
            ),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(ctx: &mut Context, params: &LTurnBendParams) -> Result<ComponentId> {
        let r = params.effective_radius;
        ensure(r > 0., "effective_radius > 0")?;
        ensure(
            (0. ..=1.).contains(&params.euler_fraction),
            "0 ≤ euler_fraction ≤ 1",
        )?;
        check_technology(ctx);
        let spec = params.port_spec.resolve(&ctx.technology)?;

        let endpoint = Point::new(r, r);
        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        for (layer, mut path) in spec.get_paths(Point::zero()) {
            path.arc(-90., 0., r, params.euler_fraction, Some(endpoint));
            c.add(layer, path)?;
        }
        c.add_port(Port::new((0., 0.), 0., spec.clone(), false), None)?;
        c.add_port(Port::new(endpoint, -90., spec, true), None)?;
        c.add_model(reciprocal_model(&params.tidy3d_model)?, "Tidy3D")?;
        ctx.library.add_component(c)
    }
}

/// The model of a two-port component whose ports are interchangeable.
fn reciprocal_model(options: &Tidy3dOptions) -> Result<Tidy3dModel> {
    Tidy3dModel::with_options(vec![PortSymmetry::new("P0", "P1", [("P1", "P0")])], options)
}

/// Builds an S bend. See [`SBendVert`].
pub fn s_bend_vert(ctx: &mut Context, params: &SBendVertParams) -> Result<ComponentId> {
    SBendVert::generate(ctx, params)
}

/// Builds a U-turn bend. See [`UTurnBend`].
pub fn u_turn_bend(ctx: &mut Context, params: &UTurnBendParams) -> Result<ComponentId> {
    UTurnBend::generate(ctx, params)
}

/// Builds a racetrack U bend. See [`UBendRacetrack`].
pub fn u_bend_racetrack(ctx: &mut Context, params: &UBendRacetrackParams) -> Result<ComponentId> {
    UBendRacetrack::generate(ctx, params)
}

/// Builds an L bend. See [`LTurnBend`].
pub fn l_turn_bend(ctx: &mut Context, params: &LTurnBendParams) -> Result<ComponentId> {
    LTurnBend::generate(ctx, params)
}
