//! Waveguide and transmission line cross-sections.

use std::cmp::Ordering;

use arcstr::ArcStr;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::Layer;

/// One strip of a cross-section.
///
/// A profile with a positive offset stands for a mirrored pair of strips centered
/// at `+offset` and `-offset` from the port axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProfile {
    /// The strip width.
    pub width: f64,
    /// The lateral distance of the strip center from the port axis.
    pub offset: f64,
    /// The layer the strip is drawn on.
    pub layer: Layer,
}

impl PathProfile {
    /// Creates a new profile.
    pub fn new(width: f64, offset: f64, layer: impl Into<Layer>) -> Self {
        Self {
            width,
            offset,
            layer: layer.into(),
        }
    }

    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.offset
            .total_cmp(&other.offset)
            .then(self.width.total_cmp(&other.width))
            .then(self.layer.cmp(&other.layer))
    }
}

/// The cross-section a port carries.
///
/// Profiles are stored in a canonical order, so two specs with the same profile
/// set compare equal regardless of the order in which the profiles were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PortSpecData")]
pub struct PortSpec {
    /// A human readable description.
    pub description: ArcStr,
    /// Width of the simulation window.
    pub width: f64,
    /// Vertical extent `(lo, hi)` of the simulation window.
    #[serde(with = "crate::layer::limits")]
    pub limits: (f64, f64),
    /// Number of supported modes.
    pub num_modes: u32,
    /// Target effective index for the mode solver.
    pub target_neff: f64,
    path_profiles: Vec<PathProfile>,
}

#[derive(Deserialize)]
struct PortSpecData {
    description: ArcStr,
    width: f64,
    #[serde(with = "crate::layer::limits")]
    limits: (f64, f64),
    num_modes: u32,
    target_neff: f64,
    path_profiles: Vec<PathProfile>,
}

impl TryFrom<PortSpecData> for PortSpec {
    type Error = Error;

    fn try_from(value: PortSpecData) -> Result<Self> {
        PortSpec::new(
            value.description,
            value.width,
            value.limits,
            value.num_modes,
            value.target_neff,
            value.path_profiles,
        )
    }
}

/// The dimensions of a coplanar waveguide cross-section.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CpwInfo {
    /// Width of the central conductor.
    pub central_width: f64,
    /// Gap between the central conductor and each ground.
    pub gap: f64,
    /// Width of each ground conductor.
    pub ground_width: f64,
    /// Distance from the port axis to the center of each ground.
    pub offset: f64,
    /// The metal layer.
    pub layer: Layer,
}

impl PortSpec {
    /// Creates a new port specification.
    ///
    /// Requires a positive window width, `limits.0 < limits.1`, at least one mode,
    /// and profiles with positive widths, non-negative offsets and unique
    /// `(offset, layer)` pairs.
    pub fn new(
        description: impl Into<ArcStr>,
        width: f64,
        limits: (f64, f64),
        num_modes: u32,
        target_neff: f64,
        path_profiles: impl IntoIterator<Item = PathProfile>,
    ) -> Result<Self> {
        crate::error::ensure(width > 0., "width > 0")?;
        crate::error::ensure(limits.0 < limits.1, "limits[0] < limits[1]")?;
        crate::error::ensure(num_modes >= 1, "num_modes ≥ 1")?;
        let mut path_profiles: Vec<PathProfile> = path_profiles.into_iter().collect();
        for profile in &path_profiles {
            crate::error::ensure(profile.width > 0., "path profile width > 0")?;
            crate::error::ensure(profile.offset >= 0., "path profile offset ≥ 0")?;
        }
        path_profiles.sort_by(PathProfile::canonical_cmp);
        for pair in path_profiles.windows(2) {
            if pair[0].offset == pair[1].offset && pair[0].layer == pair[1].layer {
                return Err(Error::invalid_parameter(format!(
                    "path profiles are unique per (offset, layer); found two at offset {} on layer {}",
                    pair[0].offset, pair[0].layer
                )));
            }
        }
        Ok(Self {
            description: description.into(),
            width,
            limits,
            num_modes,
            target_neff,
            path_profiles,
        })
    }

    /// The profiles of this cross-section, in canonical order.
    #[inline]
    pub fn path_profiles(&self) -> &[PathProfile] {
        &self.path_profiles
    }

    /// Returns one path per strip of this cross-section, all starting at `origin`.
    ///
    /// The returned paths are empty; callers extend them along the waveguide route.
    pub fn get_paths(&self, origin: Point) -> Vec<(Layer, Path)> {
        let mut paths = Vec::new();
        for profile in &self.path_profiles {
            if profile.offset > 0. {
                for offset in [profile.offset, -profile.offset] {
                    paths.push((
                        profile.layer,
                        Path::with_offset(origin, profile.width, offset),
                    ));
                }
            } else {
                paths.push((profile.layer, Path::new(origin, profile.width)));
            }
        }
        paths
    }

    fn centered(&self) -> impl Iterator<Item = &PathProfile> {
        self.path_profiles.iter().filter(|p| p.offset == 0.)
    }

    /// The narrowest strip centered on the port axis.
    pub fn core(&self) -> Option<&PathProfile> {
        self.centered()
            .min_by(|a, b| a.width.total_cmp(&b.width).then(a.layer.cmp(&b.layer)))
    }

    /// The widest strip centered on the port axis.
    pub fn cladding(&self) -> Option<&PathProfile> {
        self.centered()
            .max_by(|a, b| a.width.total_cmp(&b.width).then(a.layer.cmp(&b.layer)))
    }

    /// The narrowest strip width of any profile.
    pub fn min_width(&self) -> Option<f64> {
        self.path_profiles
            .iter()
            .map(|p| p.width)
            .min_by(f64::total_cmp)
    }

    /// Returns a copy of this specification with every strip widened by `added_width`.
    pub fn with_added_width(&self, added_width: f64) -> Result<Self> {
        Self::new(
            self.description.clone(),
            self.width,
            self.limits,
            self.num_modes,
            self.target_neff,
            self.path_profiles.iter().map(|p| PathProfile {
                width: p.width + added_width,
                ..*p
            }),
        )
    }

    /// Returns `true` if both specifications have the same profile set.
    pub fn same_profiles(&self, other: &PortSpec) -> bool {
        self.path_profiles == other.path_profiles
    }

    /// Interprets this specification as a coplanar waveguide.
    ///
    /// Requires exactly one centered conductor and one mirrored ground pair on the
    /// same layer, separated by a positive gap.
    pub fn cpw_info(&self) -> Result<CpwInfo> {
        let not_cpw = || {
            Error::invalid_parameter(
                "port specification is a coplanar waveguide (one centered conductor and one ground pair)",
            )
        };
        let [a, b] = self.path_profiles.as_slice() else {
            return Err(not_cpw());
        };
        // Canonical order puts the centered conductor first.
        if a.offset != 0. || b.offset <= 0. || a.layer != b.layer {
            return Err(not_cpw());
        }
        let gap = b.offset - 0.5 * b.width - 0.5 * a.width;
        crate::error::ensure(gap > 0., "CPW gap > 0")?;
        Ok(CpwInfo {
            central_width: a.width,
            gap,
            ground_width: b.width,
            offset: b.offset,
            layer: a.layer,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn rwg() -> PortSpec {
        PortSpec::new(
            "ridge",
            6.,
            (-1.5, 1.9),
            2,
            2.2,
            [
                PathProfile::new(10., 0., (3, 0)),
                PathProfile::new(1., 0., (2, 0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn profiles_are_order_independent() {
        let reordered = PortSpec::new(
            "ridge",
            6.,
            (-1.5, 1.9),
            2,
            2.2,
            [
                PathProfile::new(1., 0., (2, 0)),
                PathProfile::new(10., 0., (3, 0)),
            ],
        )
        .unwrap();
        assert_eq!(rwg(), reordered);
    }

    #[test]
    fn core_and_cladding() {
        let spec = rwg();
        assert_eq!(spec.core().unwrap().layer, Layer(2, 0));
        assert_eq!(spec.cladding().unwrap().width, 10.);
    }

    #[test]
    fn duplicate_profiles_are_rejected() {
        let err = PortSpec::new(
            "bad",
            6.,
            (0., 1.),
            1,
            2.,
            [
                PathProfile::new(1., 0., (2, 0)),
                PathProfile::new(2., 0., (2, 0)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn added_width_applies_to_every_profile() {
        let wide = rwg().with_added_width(1.5).unwrap();
        let widths: Vec<f64> = wide.path_profiles().iter().map(|p| p.width).collect();
        assert_eq!(widths, vec![2.5, 11.5]);
    }

    #[test]
    fn cpw_info_recovers_dimensions() {
        let cpw = PortSpec::new(
            "cpw",
            100.,
            (-10., 10.),
            1,
            2.,
            [
                PathProfile::new(15., 0., (21, 0)),
                PathProfile::new(250., 7.5 + 5. + 125., (21, 0)),
            ],
        )
        .unwrap();
        let info = cpw.cpw_info().unwrap();
        assert_abs_diff_eq!(info.gap, 5.);
        assert_eq!(info.central_width, 15.);
        assert_eq!(info.ground_width, 250.);
        assert!(rwg().cpw_info().is_err());
        assert_eq!(cpw.get_paths(Point::zero()).len(), 3);
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"description":"x","width":1,"limits":["-inf",1],"num_modes":0,
            "target_neff":1,"path_profiles":[]}"#;
        assert!(serde_json::from_str::<PortSpec>(json).is_err());
    }
}
