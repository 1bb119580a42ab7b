//! Simulation and behavior models attached to components.
//!
//! Each model kind has an explicit option struct. Generators build a model from
//! their own defaults and merge caller-supplied options over them.

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ensure, Result};

/// A behavior model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    /// A full-wave frequency-domain electromagnetic model.
    Tidy3d(Tidy3dModel),
    /// A reduced circuit-level model.
    Circuit(CircuitModel),
}

impl Model {
    /// The names of all ports this model refers to.
    pub fn port_names(&self) -> Vec<&ArcStr> {
        match self {
            Model::Tidy3d(model) => model
                .port_symmetries
                .iter()
                .flat_map(PortSymmetry::port_names)
                .collect(),
            Model::Circuit(_) => Vec::new(),
        }
    }
}

impl From<Tidy3dModel> for Model {
    fn from(value: Tidy3dModel) -> Self {
        Self::Tidy3d(value)
    }
}

impl From<CircuitModel> for Model {
    fn from(value: CircuitModel) -> Self {
        Self::Circuit(value)
    }
}

/// Declares that exciting `source` yields the same response as exciting `target`,
/// with the output ports permuted by `mapping`.
///
/// Lets the solver skip redundant simulations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSymmetry {
    /// The port whose simulation is skipped.
    pub source: ArcStr,
    /// The port whose simulation is reused.
    pub target: ArcStr,
    /// Port permutation from `source` results to `target` results.
    pub mapping: IndexMap<ArcStr, ArcStr>,
}

impl PortSymmetry {
    /// Creates a port symmetry from string slices.
    pub fn new<'a>(
        source: &str,
        target: &str,
        mapping: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            mapping: mapping
                .into_iter()
                .map(|(k, v)| (ArcStr::from(k), ArcStr::from(v)))
                .collect(),
        }
    }

    fn port_names(&self) -> impl Iterator<Item = &ArcStr> {
        [&self.source, &self.target]
            .into_iter()
            .chain(self.mapping.iter().flat_map(|(k, v)| [k, v]))
    }
}

/// Default mesh refinement factor.
pub const DEFAULT_MESH_REFINEMENT: f64 = 20.;

/// Full-wave frequency-domain model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tidy3dModel {
    /// Port symmetries used to skip redundant simulations.
    pub port_symmetries: Vec<PortSymmetry>,
    /// Mesh refinement factor (grid steps per wavelength in the densest medium).
    pub mesh_refinement: f64,
    /// Simulation run time in seconds; the solver picks one if unset.
    pub run_time: Option<f64>,
    /// Print solver progress.
    pub verbose: bool,
}

impl Default for Tidy3dModel {
    fn default() -> Self {
        Self {
            port_symmetries: Vec::new(),
            mesh_refinement: DEFAULT_MESH_REFINEMENT,
            run_time: None,
            verbose: true,
        }
    }
}

/// Caller overrides for a [`Tidy3dModel`]. Unset fields keep the generator's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tidy3dOptions {
    /// Replaces the default port symmetries.
    pub port_symmetries: Option<Vec<PortSymmetry>>,
    /// Overrides the mesh refinement factor.
    pub mesh_refinement: Option<f64>,
    /// Overrides the run time.
    pub run_time: Option<f64>,
    /// Overrides verbosity.
    pub verbose: Option<bool>,
}

impl Tidy3dModel {
    /// Creates a model with the given default port symmetries and options merged on top.
    ///
    /// Requires `mesh_refinement > 0` and, if set, `run_time > 0`.
    pub fn with_options(port_symmetries: Vec<PortSymmetry>, options: &Tidy3dOptions) -> Result<Self> {
        let defaults = Self::default();
        let model = Self {
            port_symmetries: options.port_symmetries.clone().unwrap_or(port_symmetries),
            mesh_refinement: options.mesh_refinement.unwrap_or(defaults.mesh_refinement),
            run_time: options.run_time.or(defaults.run_time),
            verbose: options.verbose.unwrap_or(defaults.verbose),
        };
        ensure(model.mesh_refinement > 0., "mesh_refinement > 0")?;
        if let Some(run_time) = model.run_time {
            ensure(run_time > 0., "run_time > 0")?;
        }
        Ok(model)
    }
}

/// Circuit-level model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitModel {
    /// Mesh refinement used when simulating sub-components.
    pub mesh_refinement: f64,
    /// Print solver progress.
    pub verbose: bool,
}

impl Default for CircuitModel {
    fn default() -> Self {
        Self {
            mesh_refinement: DEFAULT_MESH_REFINEMENT,
            verbose: true,
        }
    }
}

/// Caller overrides for a [`CircuitModel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitOptions {
    /// Overrides the mesh refinement factor.
    pub mesh_refinement: Option<f64>,
    /// Overrides verbosity.
    pub verbose: Option<bool>,
}

impl CircuitModel {
    /// Creates a model with the given options merged over the defaults.
    pub fn with_options(options: &CircuitOptions) -> Result<Self> {
        let defaults = Self::default();
        let model = Self {
            mesh_refinement: options.mesh_refinement.unwrap_or(defaults.mesh_refinement),
            verbose: options.verbose.unwrap_or(defaults.verbose),
        };
        ensure(model.mesh_refinement > 0., "mesh_refinement > 0")?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn options_merge_over_defaults() {
        let defaults = vec![PortSymmetry::new("P0", "P1", [("P1", "P0")])];
        let model = Tidy3dModel::with_options(
            defaults.clone(),
            &Tidy3dOptions {
                verbose: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(model.port_symmetries, defaults);
        assert!(!model.verbose);
        assert_eq!(model.mesh_refinement, DEFAULT_MESH_REFINEMENT);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = Tidy3dModel::with_options(
            Vec::new(),
            &Tidy3dOptions {
                mesh_refinement: Some(0.),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { condition } if condition == "mesh_refinement > 0"));
    }

    #[test]
    fn unknown_options_fail_to_parse() {
        assert!(serde_json::from_str::<Tidy3dOptions>(r#"{"bogus": 1}"#).is_err());
    }

    #[test]
    fn port_names_cover_mapping() {
        let model = Model::from(Tidy3dModel {
            port_symmetries: vec![PortSymmetry::new("P1", "P2", [("P0", "P0"), ("P2", "P1")])],
            ..Default::default()
        });
        let names: Vec<&str> = model.port_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["P1", "P2", "P0", "P0", "P2", "P1"]);
    }
}
