//! The LNOI400 lithium niobate on insulator process and component library.
//!
//! [`lnoi400`] builds the technology: a 400 nm LN film on buried oxide with
//! ridge, rib and strip waveguides and a gold transmission line layer. The
//! [`components`] module holds the parametric components designed for it,
//! and [`ui`] exports their argument metadata.
#![warn(missing_docs)]

pub mod components;
pub mod generator;
pub mod layers;
pub mod technology;
#[cfg(test)]
mod tests;
pub mod ui;

pub use components::generators;
pub use generator::{Generator, PortSpecRef};
pub use technology::{cpw_spec, lnoi400, Lnoi400Params};

/// The library version, also used as the technology version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
