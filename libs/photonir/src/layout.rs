//! Flattened, single-level layouts and their file format.

use std::path::Path;

use arcstr::ArcStr;
use geometry::prelude::*;
use geometry::region::Region;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layer::Layer;

/// A component flattened into per-layer polygons.
///
/// This is the interchange format for golden layouts and regression artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatLayout {
    /// The name of the flattened component.
    pub name: ArcStr,
    /// Polygons per layer, in ascending layer order.
    pub layers: Vec<(Layer, Vec<Polygon>)>,
}

impl FlatLayout {
    /// Creates a layout, sorting layers and dropping empty ones.
    pub fn new(name: impl Into<ArcStr>, layers: impl IntoIterator<Item = (Layer, Vec<Polygon>)>) -> Self {
        let mut layers: Vec<(Layer, Vec<Polygon>)> = layers
            .into_iter()
            .filter(|(_, polygons)| !polygons.is_empty())
            .collect();
        layers.sort_by_key(|(layer, _)| *layer);
        Self {
            name: name.into(),
            layers,
        }
    }

    /// The polygons drawn on `layer`.
    pub fn polygons(&self, layer: Layer) -> &[Polygon] {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, polygons)| polygons.as_slice())
            .unwrap_or_default()
    }

    /// The layers present in this layout.
    pub fn layer_set(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.iter().map(|(layer, _)| *layer)
    }

    /// The union of all polygons on `layer`.
    pub fn region(&self, layer: Layer) -> Region {
        Region::from_polygons(self.polygons(layer))
    }

    /// Reads a layout from a JSON file.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes this layout to a JSON file, creating parent directories as needed.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

impl Bbox for FlatLayout {
    fn bbox(&self) -> Option<Rect> {
        self.layers
            .iter()
            .flat_map(|(_, polygons)| polygons)
            .fold(None, |acc, p| geometry::bbox::bounding_union(acc, p.bbox()))
    }
}
