//! Geometric regression testing against golden layouts.
//!
//! Two layouts are considered equivalent when the area of their symmetric difference,
//! summed over all layers, is a small fraction of the golden layout's total area.
//! Vertex-level equality is not required, since different construction paths
//! legitimately sample the same curve differently.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::layout::FlatLayout;

/// The default accepted ratio of difference area to golden area.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Per-layer areas of a layout comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerDiff {
    /// The compared layer.
    pub layer: Layer,
    /// Area of the golden geometry on this layer.
    pub golden_area: f64,
    /// Area of the symmetric difference on this layer.
    pub diff_area: f64,
}

/// The result of comparing a candidate layout with a golden layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDiff {
    /// Per-layer results, over the union of both layer sets.
    pub layers: Vec<LayerDiff>,
    /// The difference geometry itself.
    pub diff: FlatLayout,
}

impl LayoutDiff {
    /// Compares `candidate` against `golden`.
    pub fn compute(candidate: &FlatLayout, golden: &FlatLayout) -> Self {
        let layers: BTreeSet<Layer> = candidate.layer_set().chain(golden.layer_set()).collect();
        let mut results = Vec::with_capacity(layers.len());
        let mut diff_layers = Vec::new();
        for layer in layers {
            let golden_region = golden.region(layer);
            let diff = candidate.region(layer).xor(&golden_region);
            let diff_area = diff.area();
            results.push(LayerDiff {
                layer,
                golden_area: golden_region.area(),
                diff_area,
            });
            if diff_area > 0. {
                diff_layers.push((layer, diff.rings()));
            }
        }
        Self {
            layers: results,
            diff: FlatLayout::new(arcstr::format!("{}_diff", candidate.name), diff_layers),
        }
    }

    /// Total golden area.
    pub fn golden_area(&self) -> f64 {
        self.layers.iter().map(|l| l.golden_area).sum()
    }

    /// Total difference area.
    pub fn diff_area(&self) -> f64 {
        self.layers.iter().map(|l| l.diff_area).sum()
    }

    /// Difference area relative to golden area.
    ///
    /// Zero when both layouts are empty; infinite when only the golden layout is empty.
    pub fn ratio(&self) -> f64 {
        let (diff, golden) = (self.diff_area(), self.golden_area());
        if diff == 0. {
            0.
        } else if golden == 0. {
            f64::INFINITY
        } else {
            diff / golden
        }
    }
}

/// Accepted difference ratios, per component family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// The tolerance for families without an override.
    pub default: f64,
    /// Family-specific tolerances.
    pub overrides: IndexMap<ArcStr, f64>,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            default: DEFAULT_TOLERANCE,
            overrides: IndexMap::new(),
        }
    }
}

impl Tolerances {
    /// The tolerance applied to `family`.
    pub fn get(&self, family: &str) -> f64 {
        self.overrides.get(family).copied().unwrap_or(self.default)
    }
}

/// Compares generated layouts against golden files in a directory.
///
/// The golden layout of family `F` is `<golden_dir>/F.json`. On failure the
/// candidate and the difference are written to `<artifact_dir>/F.json` and
/// `<artifact_dir>/F_diff.json`.
#[derive(Debug, Clone)]
pub struct RegressionHarness {
    /// Directory of golden layouts.
    pub golden_dir: PathBuf,
    /// Directory receiving artifacts of failed comparisons.
    pub artifact_dir: PathBuf,
    /// Accepted difference ratios.
    pub tolerances: Tolerances,
    /// Write missing golden layouts instead of failing.
    pub bless: bool,
}

impl RegressionHarness {
    /// Creates a harness with default tolerances.
    pub fn new(golden_dir: impl Into<PathBuf>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            golden_dir: golden_dir.into(),
            artifact_dir: artifact_dir.into(),
            tolerances: Tolerances::default(),
            bless: false,
        }
    }

    /// The path of the golden layout for `family`.
    pub fn golden_path(&self, family: &str) -> PathBuf {
        self.golden_dir.join(format!("{family}.json"))
    }

    /// Checks `layout` against the golden layout of `family`.
    pub fn check(&self, family: &str, layout: &FlatLayout) -> Result<LayoutDiff> {
        let span = tracing::info_span!("regression", family);
        let _guard = span.enter();

        let golden_path = self.golden_path(family);
        if !golden_path.exists() {
            if self.bless {
                layout.write_json(&golden_path)?;
                tracing::info!(path = ?golden_path, "wrote golden layout");
                return Ok(LayoutDiff::compute(layout, layout));
            }
            tracing::error!(path = ?golden_path, "missing golden layout");
            return Err(Error::MissingGolden {
                family: family.into(),
                path: golden_path,
            });
        }

        let golden = FlatLayout::read_json(&golden_path)?;
        let diff = LayoutDiff::compute(layout, &golden);
        let ratio = diff.ratio();
        let tolerance = self.tolerances.get(family);
        if ratio < tolerance {
            tracing::debug!(ratio, tolerance, "layout matches golden");
            return Ok(diff);
        }

        self.write_artifacts(family, layout, &diff.diff)?;
        tracing::error!(
            ratio,
            tolerance,
            artifacts = ?self.artifact_dir,
            "layout differs from golden"
        );
        Err(Error::RegressionFailed {
            family: family.into(),
            ratio,
            tolerance,
        })
    }

    fn write_artifacts(&self, family: &str, layout: &FlatLayout, diff: &FlatLayout) -> Result<()> {
        write_into(&self.artifact_dir, &format!("{family}.json"), layout)?;
        write_into(&self.artifact_dir, &format!("{family}_diff.json"), diff)
    }
}

fn write_into(dir: &Path, file: &str, layout: &FlatLayout) -> Result<()> {
    layout.write_json(dir.join(file))
}
