//! The LNOI400 layer stack, extrusion recipe and port catalog.

use arcstr::ArcStr;
use photonir::error::ensure;
use photonir::{
    ExtrusionSpec, LayerSpec, MaskSpec, Medium, PathProfile, PortSpec, Result, Technology,
};
use serde::{Deserialize, Serialize};

use crate::generator::Argument;
use crate::layers::*;

/// The technology name.
pub const TECHNOLOGY_NAME: &str = "LNOI400";

/// Vertical half margin of coplanar waveguide port windows around the metal stack.
const CPW_PORT_MARGIN: f64 = 10.;

/// Parameters of the LNOI400 layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Lnoi400Params {
    /// LN film thickness.
    pub ln_thickness: f64,
    /// LN slab thickness after the ridge etch.
    pub slab_thickness: f64,
    /// LN sidewall angle in degrees.
    pub sidewall_angle: f64,
    /// Buried oxide thickness.
    pub box_thickness: f64,
    /// Transmission line metal thickness.
    pub tl_thickness: f64,
    /// Separation between the LN film and the transmission line metal.
    pub tl_separation: f64,
    /// Extrude the silicon substrate below the buried oxide.
    pub include_substrate: bool,
    /// Extrude an opening above the metal stack.
    pub include_top_opening: bool,
    /// Cladding and buried oxide medium.
    pub sio2: Medium,
    /// Substrate medium.
    pub si: Medium,
    /// Lithium niobate medium.
    pub ln: Medium,
    /// Transmission line metal medium.
    pub tl_metal: Medium,
    /// Medium of the top opening.
    pub opening: Medium,
}

impl Default for Lnoi400Params {
    fn default() -> Self {
        Self {
            ln_thickness: 0.4,
            slab_thickness: 0.2,
            sidewall_angle: 13.,
            box_thickness: 4.7,
            tl_thickness: 0.9,
            tl_separation: 1.,
            include_substrate: false,
            include_top_opening: false,
            sio2: Medium::new("SiO2", 2.085),
            si: Medium::new("cSi", 12.085),
            ln: Medium::new("LiNbO3", 4.58),
            tl_metal: Medium::new("Au", -115.),
            opening: Medium::new("Opening", 1.),
        }
    }
}

impl Lnoi400Params {
    /// Height of the bottom of the transmission line metal.
    pub fn z_tl(&self) -> f64 {
        self.ln_thickness + self.tl_separation
    }

    /// Height of the top of the transmission line metal.
    pub fn z_top(&self) -> f64 {
        self.z_tl() + self.tl_thickness
    }

    /// Describes every parameter, in declaration order.
    pub fn arguments() -> Vec<Argument> {
        vec![
            Argument::length("ln_thickness", "LN film thickness."),
            Argument::length("slab_thickness", "LN slab thickness."),
            Argument::angle("sidewall_angle", "LN sidewall angle."),
            Argument::length("box_thickness", "Buried oxide thickness."),
            Argument::length("tl_thickness", "Transmission line metal thickness."),
            Argument::length(
                "tl_separation",
                "Separation between the LN film and the transmission line metal.",
            ),
            Argument::flag("include_substrate", "Include the silicon substrate."),
            Argument::flag(
                "include_top_opening",
                "Include an opening above the metal layers.",
            ),
            Argument::medium("sio2", "Cladding and buried oxide medium."),
            Argument::medium("si", "Substrate medium."),
            Argument::medium("ln", "Lithium niobate medium."),
            Argument::medium("tl_metal", "Transmission line metal medium."),
            Argument::medium("opening", "Medium of the top opening."),
        ]
    }

    fn validate(&self) -> Result<()> {
        ensure(self.ln_thickness > 0., "ln_thickness > 0")?;
        ensure(
            self.slab_thickness > 0. && self.slab_thickness < self.ln_thickness,
            "0 < slab_thickness < ln_thickness",
        )?;
        ensure(self.box_thickness > 0., "box_thickness > 0")?;
        ensure(self.tl_thickness > 0., "tl_thickness > 0")?;
        ensure(self.tl_separation >= 0., "tl_separation ≥ 0")?;
        ensure(
            self.sidewall_angle.abs() < 90.,
            "-90 < sidewall_angle < 90",
        )
    }
}

/// A coplanar waveguide cross-section on the `TL` layer.
///
/// The grounds are centered at `signal_width / 2 + gap + ground_width / 2` on each side.
pub fn cpw_spec(signal_width: f64, gap: f64, ground_width: f64) -> Result<PortSpec> {
    ensure(signal_width > 0., "signal_width > 0")?;
    ensure(gap > 0., "gap > 0")?;
    ensure(ground_width > 0., "ground_width > 0")?;
    let defaults = Lnoi400Params::default();
    PortSpec::new(
        "CPW transmission line",
        signal_width + 2. * gap + 2. * ground_width,
        (-CPW_PORT_MARGIN, defaults.z_top() + CPW_PORT_MARGIN),
        1,
        2.2,
        [
            PathProfile::new(signal_width, 0., TL),
            PathProfile::new(ground_width, 0.5 * signal_width + gap + 0.5 * ground_width, TL),
        ],
    )
}

/// Creates the LNOI400 technology.
///
/// The technology version is the version of this crate.
pub fn lnoi400(params: &Lnoi400Params) -> Result<Technology> {
    params.validate()?;

    let layers = [
        ("LN_STRIP", LayerSpec::new(LN_STRIP, "LN etch (ridge)", "#7d57de18", "//")),
        ("LN_RIB", LayerSpec::new(LN_RIB, "LN etch (full)", "#00008018", "\\")),
        ("RIB_NEGATIVE", LayerSpec::new(RIB_NEGATIVE, "Slab etch negative", "#6750bf18", "\\")),
        ("LABELS", LayerSpec::new(LABELS, "Labels (LN etch)", "#5179b518", "/")),
        ("CHIP_CONTOUR", LayerSpec::new(CHIP_CONTOUR, "Usable floorplan area", "#ffc6b818", "\\")),
        (
            "CHIP_EXCLUSION_ZONE",
            LayerSpec::new(CHIP_EXCLUSION_ZONE, "Final chip boundaries", "#00fe9c18", "/"),
        ),
        ("TL", LayerSpec::new(TL, "Metal transmission lines", "#3503fc18", "\\")),
        ("HT", LayerSpec::new(HT, "Metal heaters", "#3503fc18", ".")),
        ("ALIGN", LayerSpec::new(ALIGN, "Alignment markers (LN etch)", "#5179b518", "/")),
        (
            "DOC",
            LayerSpec::new(DOC, "Labels for GDS layout (not fabricated)", "#80a8ff18", "."),
        ),
    ]
    .map(|(name, spec)| (ArcStr::from(name), spec));

    let z_tl = params.z_tl();
    let z_top = params.z_top();
    let mut extrusion_specs = vec![
        ExtrusionSpec::new(
            MaskSpec::bounds(),
            params.ln.clone(),
            (0., params.slab_thickness),
            0.,
        ),
        ExtrusionSpec::new(
            MaskSpec::union([LN_STRIP, LABELS, ALIGN]),
            params.ln.clone(),
            (0., params.ln_thickness),
            params.sidewall_angle,
        ),
        ExtrusionSpec::new(
            MaskSpec::difference(RIB_NEGATIVE, LN_RIB),
            params.sio2.clone(),
            (0., params.ln_thickness),
            -params.sidewall_angle,
        ),
        ExtrusionSpec::new(MaskSpec::layer(TL), params.tl_metal.clone(), (z_tl, z_top), 0.),
        ExtrusionSpec::new(MaskSpec::layer(HT), params.tl_metal.clone(), (z_tl, z_top), 0.),
    ];
    if params.include_substrate {
        extrusion_specs.push(ExtrusionSpec::new(
            MaskSpec::bounds(),
            params.si.clone(),
            (f64::NEG_INFINITY, -params.box_thickness),
            0.,
        ));
    }
    if params.include_top_opening {
        extrusion_specs.push(ExtrusionSpec::new(
            MaskSpec::bounds(),
            params.opening.clone(),
            (z_top, f64::INFINITY),
            0.,
        ));
    }

    let rwg_port_gap = params.box_thickness.min(1.5);
    let rwg_port_limits = (-rwg_port_gap, params.ln_thickness + rwg_port_gap);
    let swg_port_gap = params.box_thickness.min(2.1);
    let swg_port_limits = (-swg_port_gap, params.slab_thickness + swg_port_gap);

    let ports = [
        (
            "RWG1000",
            PortSpec::new(
                "LN single mode ridge waveguide for C-band, TE mode",
                6.,
                rwg_port_limits,
                2,
                2.2,
                [
                    PathProfile::new(1., 0., LN_STRIP),
                    PathProfile::new(10., 0., LN_RIB),
                ],
            )?,
        ),
        (
            "RWG3000",
            PortSpec::new(
                "LN multimode mode ridge for C-band, TE mode",
                8.,
                rwg_port_limits,
                5,
                2.2,
                [
                    PathProfile::new(3., 0., LN_STRIP),
                    PathProfile::new(12., 0., LN_RIB),
                ],
            )?,
        ),
        (
            "SWG250",
            PortSpec::new(
                "LN strip waveguide for C-band, TE mode",
                10.,
                swg_port_limits,
                1,
                2.2,
                [
                    PathProfile::new(0.25, 0., LN_RIB),
                    PathProfile::new(12., 0., RIB_NEGATIVE),
                ],
            )?,
        ),
        ("UniCPW", cpw_spec(15., 5., 250.)?),
        ("UniCPW-EO", cpw_spec(10., 4., 180.)?),
    ]
    .map(|(name, spec)| (ArcStr::from(name), spec));

    Technology::new(
        TECHNOLOGY_NAME,
        crate::VERSION,
        layers,
        extrusion_specs,
        ports,
        params.sio2.clone(),
    )
}
