//! Fabrication technologies: layer tables, extrusion recipes and port catalogs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{ExtrusionSpec, Layer, LayerRef, LayerSpec, Medium};
use crate::port_spec::PortSpec;

/// A named, versioned catalog for one fabrication process variant.
///
/// Technologies are validated on construction and immutable afterwards;
/// share them behind an [`Arc`].
///
/// Equality compares the name, version, layer table and port table only.
/// Use [`Technology::extrusion_equivalent`] to compare extrusion recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TechnologyData")]
pub struct Technology {
    name: ArcStr,
    version: ArcStr,
    layers: IndexMap<ArcStr, LayerSpec>,
    extrusion_specs: Vec<ExtrusionSpec>,
    ports: IndexMap<ArcStr, Arc<PortSpec>>,
    background_medium: Medium,
}

#[derive(Deserialize)]
struct TechnologyData {
    name: ArcStr,
    version: ArcStr,
    layers: IndexMap<ArcStr, LayerSpec>,
    extrusion_specs: Vec<ExtrusionSpec>,
    ports: IndexMap<ArcStr, PortSpec>,
    background_medium: Medium,
}

impl TryFrom<TechnologyData> for Technology {
    type Error = Error;

    fn try_from(value: TechnologyData) -> Result<Self> {
        Technology::new(
            value.name,
            value.version,
            value.layers,
            value.extrusion_specs,
            value.ports,
            value.background_medium,
        )
    }
}

impl PartialEq for Technology {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.layers == other.layers
            && self.ports == other.ports
    }
}

impl Technology {
    /// Creates and validates a technology.
    ///
    /// Fails with [`Error::InvalidTechnology`] if two layer names share a layer,
    /// an extrusion rule names an undeclared layer or has `lo ≥ hi`,
    /// or a port specification draws on an undeclared layer.
    pub fn new(
        name: impl Into<ArcStr>,
        version: impl Into<ArcStr>,
        layers: impl IntoIterator<Item = (ArcStr, LayerSpec)>,
        extrusion_specs: Vec<ExtrusionSpec>,
        ports: impl IntoIterator<Item = (ArcStr, PortSpec)>,
        background_medium: Medium,
    ) -> Result<Self> {
        let tech = Self {
            name: name.into(),
            version: version.into(),
            layers: layers.into_iter().collect(),
            extrusion_specs,
            ports: ports
                .into_iter()
                .map(|(name, spec)| (name, Arc::new(spec)))
                .collect(),
            background_medium,
        };
        tech.validate()?;
        tracing::debug!(
            name = %tech.name,
            version = %tech.version,
            layers = tech.layers.len(),
            ports = tech.ports.len(),
            "created technology"
        );
        Ok(tech)
    }

    fn validate(&self) -> Result<()> {
        let mut seen: HashMap<Layer, &ArcStr> = HashMap::new();
        for (name, spec) in &self.layers {
            if let Some(other) = seen.insert(spec.layer, name) {
                return Err(Error::InvalidTechnology(format!(
                    "layers `{other}` and `{name}` both use layer {}",
                    spec.layer
                )));
            }
        }
        for (i, rule) in self.extrusion_specs.iter().enumerate() {
            if let Some(layer) = rule.mask.layers().find(|l| !seen.contains_key(l)) {
                return Err(Error::InvalidTechnology(format!(
                    "extrusion rule {i} uses undeclared layer {layer}"
                )));
            }
            let (lo, hi) = rule.limits;
            if lo.is_nan() || hi.is_nan() || lo >= hi {
                return Err(Error::InvalidTechnology(format!(
                    "extrusion rule {i} has limits ({lo}, {hi}); expected lo < hi"
                )));
            }
        }
        for (name, spec) in &self.ports {
            if let Some(profile) = spec
                .path_profiles()
                .iter()
                .find(|p| !seen.contains_key(&p.layer))
            {
                return Err(Error::InvalidTechnology(format!(
                    "port specification `{name}` uses undeclared layer {}",
                    profile.layer
                )));
            }
        }
        Ok(())
    }

    /// The technology name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The technology version.
    #[inline]
    pub fn version(&self) -> &ArcStr {
        &self.version
    }

    /// The layer table, in declaration order.
    #[inline]
    pub fn layers(&self) -> &IndexMap<ArcStr, LayerSpec> {
        &self.layers
    }

    /// The extrusion rules, in stacking order.
    #[inline]
    pub fn extrusion_specs(&self) -> &[ExtrusionSpec] {
        &self.extrusion_specs
    }

    /// The port catalog.
    #[inline]
    pub fn ports(&self) -> &IndexMap<ArcStr, Arc<PortSpec>> {
        &self.ports
    }

    /// The medium surrounding all extruded structures.
    #[inline]
    pub fn background_medium(&self) -> &Medium {
        &self.background_medium
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Result<Layer> {
        self.layers
            .get(name)
            .map(|spec| spec.layer)
            .ok_or_else(|| Error::not_found("layer", name))
    }

    /// Returns the name under which `layer` is declared, if any.
    pub fn layer_named(&self, layer: Layer) -> Option<&ArcStr> {
        self.layers
            .iter()
            .find(|(_, spec)| spec.layer == layer)
            .map(|(name, _)| name)
    }

    /// Resolves a layer reference against the layer table.
    pub fn resolve_layer(&self, layer: &LayerRef) -> Result<Layer> {
        match layer {
            LayerRef::Name(name) => self.layer(name),
            LayerRef::Layer(layer) => {
                if self.layer_named(*layer).is_some() {
                    Ok(*layer)
                } else {
                    Err(Error::not_found("layer", layer.to_string()))
                }
            }
        }
    }

    /// Looks up a port specification by name.
    pub fn port_spec(&self, name: &str) -> Result<Arc<PortSpec>> {
        self.ports
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found("port specification", name))
    }

    /// Order-sensitive structural comparison of the extrusion recipes and background media.
    pub fn extrusion_equivalent(&self, other: &Technology) -> bool {
        self.extrusion_specs == other.extrusion_specs
            && self.background_medium == other.background_medium
    }

    /// Serializes this technology to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes and validates a technology from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes this technology as JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads and validates a technology from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
