//! LNOI400 layers.

use photonir::Layer;

/// LN etch (ridge).
pub const LN_STRIP: Layer = Layer(2, 0);
/// LN etch (full).
pub const LN_RIB: Layer = Layer(3, 0);
/// Slab etch negative.
pub const RIB_NEGATIVE: Layer = Layer(3, 1);
/// Labels (LN etch).
pub const LABELS: Layer = Layer(4, 0);
/// Usable floorplan area.
pub const CHIP_CONTOUR: Layer = Layer(6, 0);
/// Final chip boundaries.
pub const CHIP_EXCLUSION_ZONE: Layer = Layer(6, 1);
/// Metal transmission lines.
pub const TL: Layer = Layer(21, 0);
/// Metal heaters.
pub const HT: Layer = Layer(21, 1);
/// Alignment markers (LN etch).
pub const ALIGN: Layer = Layer(31, 0);
/// Labels for GDS layout, not fabricated.
pub const DOC: Layer = Layer(201, 0);
