//! An intermediate representation for photonic integrated circuit layouts.
//!
//! Components hold per-layer geometry, directed [`Port`]s and [`Reference`]s to
//! other components stored in a [`Library`]. References are placed by connecting
//! one of their ports to a port elsewhere in the parent, and a [`Technology`]
//! describes the layers, extrusion recipe and port cross-sections available to
//! a fabrication process.

#![warn(missing_docs)]

pub mod component;
pub mod context;
pub mod error;
pub mod extrude;
pub mod id;
pub mod layer;
pub mod layout;
pub mod library;
pub mod model;
pub mod parametric;
pub mod port;
pub mod port_spec;
pub mod reference;
pub mod regression;
pub mod technology;
pub mod warning;

#[cfg(test)]
mod tests;

pub use component::Component;
pub use context::Context;
pub use error::{Error, Result};
pub use layer::{ExtrusionSpec, Layer, LayerRef, LayerSpec, MaskOperation, MaskSpec, Medium};
pub use layout::FlatLayout;
pub use library::{ComponentId, Library};
pub use model::{CircuitModel, CircuitOptions, Model, PortSymmetry, Tidy3dModel, Tidy3dOptions};
pub use port::Port;
pub use port_spec::{CpwInfo, PathProfile, PortSpec};
pub use reference::Reference;
pub use technology::Technology;
pub use warning::{ConfigurationWarning, WarningCause};
