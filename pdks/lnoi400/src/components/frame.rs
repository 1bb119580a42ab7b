//! Chip frames.

use arcstr::ArcStr;
use geometry::prelude::*;
use photonir::error::ensure;
use photonir::{Component, ComponentId, Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::{check_technology, component_name, Argument, Generator};
use crate::layers::{CHIP_CONTOUR, CHIP_EXCLUSION_ZONE};

/// Width of the exclusion zone along the chip edges.
const EXCLUSION_WIDTH: f64 = 50.;

/// Parameters of [`ChipFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChipFrameParams {
    /// Chip dimension in the horizontal direction.
    pub x_size: f64,
    /// Chip dimension in the vertical direction.
    pub y_size: f64,
    /// Component name.
    pub name: Option<ArcStr>,
}

impl Default for ChipFrameParams {
    fn default() -> Self {
        Self {
            x_size: 10100.,
            y_size: 5050.,
            name: None,
        }
    }
}

/// The chip extent and the exclusion zone around it.
///
/// Only edge couplers routed to the facet belong in the exclusion zone.
/// Dimensions snap to 5050 μm, 10100 μm or 20200 μm in each direction.
pub struct ChipFrame;

/// Snaps a requested die dimension to an allowed one.
pub fn snap_die_size(size: f64) -> f64 {
    if size < 10000. {
        5050.
    } else if size < 20000. {
        10100.
    } else {
        20200.
    }
}

impl Generator for ChipFrame {
    type Params = ChipFrameParams;
    const FUNCTION: &'static str = "chip_frame";
    const NAME_PREFIX: &'static str = "CHIP_FRAME";

    fn arguments() -> Vec<Argument> {
        vec![
            Argument::chip_size("x_size", "Chip dimension in the horizontal direction."),
            Argument::chip_size("y_size", "Chip dimension in the vertical direction."),
            Argument::name(),
            Argument::technology(),
        ]
    }

    fn generate(ctx: &mut Context, params: &ChipFrameParams) -> Result<ComponentId> {
        check_technology(ctx);
        let x = snap_die_size(params.x_size);
        let y = snap_die_size(params.y_size);
        ensure(
            x > 5050. || y > 5050.,
            "die size ≥ 5050 μm × 10100 μm",
        )?;

        let mut c = Component::new(component_name::<Self>(&params.name), ctx.technology.clone());
        c.add(CHIP_EXCLUSION_ZONE, Rect::from_sides(0., 0., x, y))?;
        c.add(
            CHIP_CONTOUR,
            Rect::from_sides(
                EXCLUSION_WIDTH,
                EXCLUSION_WIDTH,
                x - EXCLUSION_WIDTH,
                y - EXCLUSION_WIDTH,
            ),
        )?;
        ctx.library.add_component(c)
    }
}

/// Builds a chip frame. See [`ChipFrame`].
pub fn chip_frame(ctx: &mut Context, params: &ChipFrameParams) -> Result<ComponentId> {
    ChipFrame::generate(ctx, params)
}
