//! LNOI400 component generators.

pub mod bend;
pub mod frame;
pub mod mmi;
pub mod modulator;
pub mod pad;
pub mod taper;

pub use bend::*;
pub use frame::*;
pub use mmi::*;
pub use modulator::*;
pub use pad::*;
pub use taper::*;

use crate::generator::GeneratorEntry;

/// Every generator of the library, sorted by function name.
pub fn generators() -> Vec<GeneratorEntry> {
    let mut generators = vec![
        GeneratorEntry::of::<ChipFrame>(),
        GeneratorEntry::of::<CpwProbePadLinear>(),
        GeneratorEntry::of::<DoubleLinearInverseTaper>(),
        GeneratorEntry::of::<EoPhaseShifter>(),
        GeneratorEntry::of::<LTurnBend>(),
        GeneratorEntry::of::<Mmi1x2>(),
        GeneratorEntry::of::<Mmi2x2>(),
        GeneratorEntry::of::<MzModulatorUnbalanced>(),
        GeneratorEntry::of::<SBendVert>(),
        GeneratorEntry::of::<UBendRacetrack>(),
        GeneratorEntry::of::<UTurnBend>(),
    ];
    generators.sort_by_key(|g| g.function);
    generators
}

/// Looks up a generator by function name.
pub fn generator(function: &str) -> photonir::Result<GeneratorEntry> {
    generators()
        .into_iter()
        .find(|g| g.function == function)
        .ok_or_else(|| photonir::Error::not_found("component generator", function))
}
