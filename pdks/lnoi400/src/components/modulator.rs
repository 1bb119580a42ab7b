//! Electro-optic phase shifters and modulators.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::wrap_angle_signed;
use photonir::error::ensure;
use photonir::parametric::{straight, transition};
use photonir::{
    CircuitModel, CircuitOptions, Component, ComponentId, Context, Error, Reference, Result,
    Tidy3dOptions,
};
use serde::{Deserialize, Serialize};

use super::bend::{l_turn_bend, s_bend_vert, LTurnBendParams, SBendVertParams};
use super::mmi::{mmi1x2, Mmi1x2Params};
use super::pad::{cpw_probe_pad_linear, CpwProbePadLinearParams};
use crate::generator::{check_technology, component_name, Argument, Generator, PortSpecRef};

/// Parameters of [`EoPhaseShifter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EoPhaseShifterParams {
    /// Optical waveguide cross-section.
    pub port_spec: PortSpecRef,
    /// Transmission line cross-section.
    pub tl_port_spec: PortSpecRef,
    /// Length of the transitions between the routing and modulation waveguides.
    pub taper_length: f64,
    /// Waveguide core width in the modulation section.
    pub rib_core_width_modulator: f64,
    /// Length of the modulation section, transitions included.
    pub modulation_length: f64,
    /// Include the transmission line.
    pub draw_cpw: bool,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub circuit_model: CircuitOptions,
}

impl Default for EoPhaseShifterParams {
    fn default() -> Self {
        Self {
            port_spec: "RWG1000".into(),
            tl_port_spec: "UniCPW-EO".into(),
            taper_length: 100.,
            rib_core_width_modulator: 2.5,
            modulation_length: 1000.,
            draw_cpw: true,
            name: None,
            circuit_model: CircuitOptions::default(),
        }
    }
}

/// A widened waveguide running along one gap of a coplanar waveguide.
///
/// The optical ports `P0` and `P1` sit at `x = 0` and `x = modulation_length`, in
/// the upper gap of the transmission line. The transmission line has no ports.
pub struct EoPhaseShifter;

impl Generator for EoPhaseShifter {
    type Params = EoPhaseShifterParams;
    const FUNCTION: &'static str = "eo_phase_shifter";
    const NAME_PREFIX: &'static str = "EO_SHIFTER";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::port_spec("port_spec", "Port specification for the optical waveguide."),
            Argument::port_spec(
                "tl_port_spec",
                "Port specification for the CPW transmission line.",
            ),
            Argument::length(
                "taper_length",
                "Length of the tapering section between the modulation and routing waveguides.",
            ),
            Argument::length(
                "rib_core_width_modulator",
                "Waveguide core width in the phase modulation section.",
            ),
            Argument::length("modulation_length", "Length of the phase modulation section."),
            Argument::flag(
                "draw_cpw",
                "If unset, the CPW transmission line is not included.",
            ),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(ctx: &mut Context, params: &EoPhaseShifterParams) -> Result<ComponentId> {
        check_modulation_lengths(params.taper_length, params.modulation_length)?;
        check_technology(ctx);
        let spec = params.port_spec.resolve(&ctx.technology)?;
        let tl_spec = params.tl_port_spec.resolve(&ctx.technology)?;
        let cpw = tl_spec.cpw_info()?;

        let min_width = spec
            .min_width()
            .ok_or_else(|| Error::invalid_parameter("port_spec has at least one path profile"))?;
        let mod_spec = Arc::new(spec.with_added_width(params.rib_core_width_modulator - min_width)?);

        let options = Tidy3dOptions::default();
        let taper = transition(ctx, &spec, &mod_spec, params.taper_length, &options)?;
        let modulated = straight(
            ctx,
            &mod_spec,
            params.modulation_length - 2. * params.taper_length,
            &options,
        )?;

        let y = 0.5 * (cpw.central_width + cpw.gap);
        let lib = &ctx.library;
        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        let r = c.add_reference(lib, Reference::at(taper, (0., y)))?.clone();
        c.add_port(r.port(lib, "P0")?, None)?;
        let r = c
            .add_reference(lib, modulated)?
            .connect(lib, "P0", &r.port(lib, "P1")?)?
            .clone();
        let r = c
            .add_reference(lib, taper)?
            .connect(lib, "P1", &r.port(lib, "P1")?)?
            .clone();
        c.add_port(r.port(lib, "P0")?, None)?;

        if params.draw_cpw {
            let tl = straight(ctx, &tl_spec, params.modulation_length, &options)?;
            c.add_reference(&ctx.library, tl)?;
            ctx.library.remove_port(tl, "P0")?;
            ctx.library.remove_port(tl, "P1")?;
        }

        c.add_model(CircuitModel::with_options(&params.circuit_model)?, "Circuit")?;
        ctx.library.add_component(c)
    }
}

fn check_modulation_lengths(taper_length: f64, modulation_length: f64) -> Result<()> {
    ensure(taper_length > 0., "taper_length > 0")?;
    ensure(
        modulation_length > 2. * taper_length,
        "modulation_length > 2 * taper_length",
    )
}

/// Parameters of [`MzModulatorUnbalanced`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MzModulatorUnbalancedParams {
    /// A splitter with at least 3 ports; a default 1×2 MMI if unset.
    ///
    /// Ports are taken in name order: the input, then the two outputs.
    pub splitter: Option<ComponentId>,
    /// Transmission line cross-section.
    pub tl_port_spec: PortSpecRef,
    /// Length of the transitions between the routing and modulation waveguides.
    pub taper_length: f64,
    /// Waveguide core width in the modulation section.
    pub rib_core_width_modulator: f64,
    /// Length of the modulation section.
    pub modulation_length: f64,
    /// Length difference between the two arms.
    pub length_imbalance: f64,
    /// Length of the horizontal section usable for phase tuning.
    pub bias_tuning_section_length: f64,
    /// Width of the central conductor on the pad side.
    pub rf_pad_start_width: f64,
    /// Length of the straight pad section.
    pub rf_pad_length_straight: f64,
    /// Length of the tapered pad section.
    pub rf_pad_length_tapered: f64,
    /// Include the transmission line and pads.
    pub draw_cpw: bool,
    /// Component name.
    pub name: Option<ArcStr>,
    /// Model overrides.
    pub circuit_model: CircuitOptions,
}

impl Default for MzModulatorUnbalancedParams {
    fn default() -> Self {
        Self {
            splitter: None,
            tl_port_spec: "UniCPW-EO".into(),
            taper_length: 100.,
            rib_core_width_modulator: 2.5,
            modulation_length: 7500.,
            length_imbalance: 100.,
            bias_tuning_section_length: 750.,
            rf_pad_start_width: 80.,
            rf_pad_length_straight: 10.,
            rf_pad_length_tapered: 190.,
            draw_cpw: true,
            name: None,
            circuit_model: CircuitOptions::default(),
        }
    }
}

/// A push-pull Mach-Zehnder modulator driven by a single GSG line.
///
/// The two arms run through the two gaps of the transmission line. Their
/// outputs fold back through a bias tuning section of unequal arm lengths
/// before recombining in a second copy of the splitter. `P0` is the input
/// and `P1` the output.
pub struct MzModulatorUnbalanced;

impl Generator for MzModulatorUnbalanced {
    type Params = MzModulatorUnbalancedParams;
    const FUNCTION: &'static str = "mz_modulator_unbalanced";
    const NAME_PREFIX: &'static str = "MZM";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::component(
                "splitter",
                "1×2 MMI splitter used in the modulator.",
                "Use default 1×2 MMI.",
            ),
            Argument::port_spec(
                "tl_port_spec",
                "Port specification for the CPW transmission line.",
            ),
            Argument::length(
                "taper_length",
                "Length of the tapering section between the modulation and routing waveguides.",
            ),
            Argument::length(
                "rib_core_width_modulator",
                "Waveguide core width in the phase modulation section.",
            ),
            Argument::length("modulation_length", "Length of the phase modulation section."),
            Argument::offset(
                "length_imbalance",
                "Length difference between the two arms of the MZI.",
            ),
            Argument::length(
                "bias_tuning_section_length",
                "Length of the horizontal section that can be used for phase tuning.",
            ),
            Argument::length(
                "rf_pad_start_width",
                "Width of the central conductor on the pad side.",
            ),
            Argument::length(
                "rf_pad_length_straight",
                "Length of the straight section of the taper on the pad side.",
            ),
            Argument::length("rf_pad_length_tapered", "Length of the tapered section."),
            Argument::flag(
                "draw_cpw",
                "If unset, the CPW transmission line is not included.",
            ),
            Argument::technology(),
            Argument::name(),
        ]
    }

    fn generate(ctx: &mut Context, params: &MzModulatorUnbalancedParams) -> Result<ComponentId> {
        check_modulation_lengths(params.taper_length, params.modulation_length)?;
        check_technology(ctx);
        let tl_spec = params.tl_port_spec.resolve(&ctx.technology)?;
        let cpw = tl_spec.cpw_info()?;

        let splitter = match params.splitter {
            Some(splitter) => splitter,
            None => mmi1x2(ctx, &Mmi1x2Params::default())?,
        };
        let mut splitter_ports: Vec<_> = ctx
            .library
            .component(splitter)?
            .ports()
            .iter()
            .map(|(name, port)| (name.clone(), port.clone()))
            .collect();
        splitter_ports.sort_by(|a, b| a.0.cmp(&b.0));
        if splitter_ports.len() < 3 {
            return Err(Error::invalid_parameter("splitter has at least 3 ports"));
        }
        let input = splitter_ports[0].0.clone();
        let output = splitter_ports[2].0.clone();
        let spec = splitter_ports[0].1.spec().clone();
        let splitter_port_distance =
            (splitter_ports[2].1.center().y - splitter_ports[1].1.center().y).abs();
        ensure(
            splitter_port_distance > 0.,
            "splitter output ports are vertically separated",
        )?;
        ensure(
            wrap_angle_signed(splitter_ports[1].1.angle() - splitter_ports[2].1.angle()).abs()
                < 1e-6,
            "splitter output ports are parallel",
        )?;

        let phase_shifters_distance = cpw.central_width + cpw.gap;
        let phase_shifter = EoPhaseShifter::generate(
            ctx,
            &EoPhaseShifterParams {
                port_spec: spec.clone().into(),
                tl_port_spec: tl_spec.clone().into(),
                taper_length: params.taper_length,
                rib_core_width_modulator: params.rib_core_width_modulator,
                modulation_length: params.modulation_length,
                draw_cpw: false,
                ..Default::default()
            },
        )?;

        let scaling = params.rf_pad_start_width / cpw.central_width;
        let pad_gap_distance = scaling * (cpw.central_width + cpw.gap);
        let input_s_offset = 0.5 * (pad_gap_distance - splitter_port_distance);
        let input_s_bend = s_bend_vert(
            ctx,
            &SBendVertParams {
                port_spec: spec.clone().into(),
                h_extent: 3.6 * input_s_offset,
                v_offset: input_s_offset,
                dx_straight: 5.,
                ..Default::default()
            },
        )?;

        let pad_s_straight = 0.5 * params.rf_pad_length_straight;
        let pad_s_bend = s_bend_vert(
            ctx,
            &SBendVertParams {
                port_spec: spec.clone().into(),
                h_extent: params.rf_pad_length_straight + params.rf_pad_length_tapered
                    - 2. * pad_s_straight,
                v_offset: 0.5 * (phase_shifters_distance - pad_gap_distance),
                dx_straight: pad_s_straight,
                ..Default::default()
            },
        )?;

        let bend = l_turn_bend(
            ctx,
            &LTurnBendParams {
                port_spec: spec.clone().into(),
                effective_radius: 75.,
                euler_fraction: 1.,
                ..Default::default()
            },
        )?;

        let options = Tidy3dOptions::default();
        let short_length = 20.;
        let long_straight = straight(
            ctx,
            &spec,
            short_length + 0.5 * params.length_imbalance.abs(),
            &options,
        )?;
        let short_straight = straight(ctx, &spec, short_length, &options)?;
        let (top_straight, bot_straight) = if params.length_imbalance > 0. {
            (long_straight, short_straight)
        } else {
            (short_straight, long_straight)
        };
        let bias_straight = straight(ctx, &spec, params.bias_tuning_section_length, &options)?;

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        let lib = &ctx.library;
        let ps_top = c.add_reference(lib, phase_shifter)?.clone();
        let ps_bot = c
            .add_reference(lib, Reference::at(phase_shifter, (0., -phase_shifters_distance)))?
            .clone();

        // Input side, top.
        let r_top = c
            .add_reference(lib, pad_s_bend)?
            .connect(lib, "P1", &ps_top.port(lib, "P0")?)?
            .clone();
        let r_top = c
            .add_reference(lib, input_s_bend)?
            .connect(lib, "P1", &r_top.port(lib, "P0")?)?
            .clone();
        let r_input = c
            .add_reference(lib, splitter)?
            .connect(lib, &output, &r_top.port(lib, "P0")?)?
            .clone();
        c.add_port(r_input.port(lib, &input)?, None)?;

        // Input side, bottom.
        let r_bot = c
            .add_reference(lib, pad_s_bend)?
            .mirror()
            .connect(lib, "P1", &ps_bot.port(lib, "P0")?)?
            .clone();
        c.add_reference(lib, input_s_bend)?
            .mirror()
            .connect(lib, "P1", &r_bot.port(lib, "P0")?)?;

        // Output side, top.
        let mut top = c
            .add_reference(lib, pad_s_bend)?
            .mirror()
            .connect(lib, "P0", &ps_top.port(lib, "P1")?)?
            .clone();
        for (child, port, target) in [
            (bend, "P0", "P1"),
            (top_straight, "P0", "P1"),
            (bend, "P1", "P1"),
            (bias_straight, "P0", "P0"),
            (bend, "P1", "P1"),
            (top_straight, "P0", "P0"),
        ] {
            top = c
                .add_reference(lib, child)?
                .connect(lib, port, &top.port(lib, target)?)?
                .clone();
        }

        // Output side, bottom.
        let mut bot = c
            .add_reference(lib, pad_s_bend)?
            .connect(lib, "P0", &ps_bot.port(lib, "P1")?)?
            .clone();
        for (child, port, target) in [
            (bend, "P1", "P1"),
            (bot_straight, "P0", "P0"),
            (bend, "P0", "P1"),
            (bias_straight, "P0", "P1"),
            (bend, "P0", "P1"),
            (bot_straight, "P0", "P1"),
        ] {
            bot = c
                .add_reference(lib, child)?
                .connect(lib, port, &bot.port(lib, target)?)?
                .clone();
        }

        let top_end = top.port(lib, "P1")?;
        let bot_end = bot.port(lib, "P1")?;
        let out_bend = l_turn_bend(
            ctx,
            &LTurnBendParams {
                port_spec: spec.clone().into(),
                effective_radius: top_end.center().y - 0.5 * splitter_port_distance,
                euler_fraction: 1.,
                ..Default::default()
            },
        )?;

        let lib = &ctx.library;
        c.add_reference(lib, out_bend)?.connect(lib, "P0", &top_end)?;
        let r_bot = c
            .add_reference(lib, out_bend)?
            .connect(lib, "P1", &bot_end)?
            .clone();
        let r_output = c
            .add_reference(lib, splitter)?
            .connect(lib, &output, &r_bot.port(lib, "P0")?)?
            .clone();
        c.add_port(r_output.port(lib, &input)?, None)?;

        if params.draw_cpw {
            let pad = cpw_probe_pad_linear(
                ctx,
                &CpwProbePadLinearParams {
                    port_spec: tl_spec.clone().into(),
                    pad_width: params.rf_pad_start_width,
                    length_straight: params.rf_pad_length_straight,
                    length_tapered: params.rf_pad_length_tapered,
                    ..Default::default()
                },
            )?;
            let tl = straight(ctx, &tl_spec, params.modulation_length, &options)?;
            let lib = &ctx.library;
            let tl_ref = c.add_reference(lib, tl)?.clone();
            c.add_reference(lib, pad)?
                .connect(lib, "P0", &tl_ref.port(lib, "P0")?)?;
            c.add_reference(lib, pad)?
                .connect(lib, "P0", &tl_ref.port(lib, "P1")?)?;
        }

        c.add_model(CircuitModel::with_options(&params.circuit_model)?, "Circuit")?;
        ctx.library.add_component(c)
    }
}

/// Builds a phase shifter. See [`EoPhaseShifter`].
pub fn eo_phase_shifter(ctx: &mut Context, params: &EoPhaseShifterParams) -> Result<ComponentId> {
    EoPhaseShifter::generate(ctx, params)
}

/// Builds a Mach-Zehnder modulator. See [`MzModulatorUnbalanced`].
pub fn mz_modulator_unbalanced(
    ctx: &mut Context,
    params: &MzModulatorUnbalancedParams,
) -> Result<ComponentId> {
    MzModulatorUnbalanced::generate(ctx, params)
}
