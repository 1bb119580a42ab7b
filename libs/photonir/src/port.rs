//! Ports: placed, directed attachment points carrying a cross-section.

use std::sync::Arc;

use geometry::prelude::*;
use geometry::wrap_angle_signed;
use serde::{Deserialize, Serialize};

use crate::port_spec::PortSpec;

/// A placed port.
///
/// The angle is the direction pointing into the component, in degrees,
/// always wrapped to `[-180, 180)`. `inverted` flips which end of the
/// cross-section is considered the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    center: Point,
    angle: f64,
    spec: Arc<PortSpec>,
    inverted: bool,
}

impl Port {
    /// Creates a new port.
    pub fn new(center: impl Into<Point>, angle: f64, spec: impl Into<Arc<PortSpec>>, inverted: bool) -> Self {
        Self {
            center: center.into(),
            angle: wrap_angle_signed(angle),
            spec: spec.into(),
            inverted,
        }
    }

    /// The port position.
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// The port direction in degrees, in `[-180, 180)`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The cross-section carried by this port.
    #[inline]
    pub fn spec(&self) -> &Arc<PortSpec> {
        &self.spec
    }

    /// Whether the port is inverted.
    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// The unit vector along the port direction.
    pub fn direction(&self) -> Point {
        Point::unit(self.angle)
    }

    /// Returns `true` if `other` sits at the same position facing the opposite way,
    /// within `tolerance` (micrometers and degrees).
    pub fn faces(&self, other: &Port, tolerance: f64) -> bool {
        let dangle = wrap_angle_signed(self.angle - other.angle + 180.).abs();
        self.center.distance(other.center) <= tolerance && dangle <= tolerance
    }
}

impl TranslateMut for Port {
    fn translate_mut(&mut self, p: Point) {
        self.center.translate_mut(p);
    }
}

impl TransformMut for Port {
    fn transform_mut(&mut self, trans: Transformation) {
        self.center = trans.apply(self.center);
        self.angle = wrap_angle_signed(trans.apply_angle(self.angle));
        if trans.is_reflection() {
            self.inverted = !self.inverted;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::port_spec::PathProfile;

    fn spec() -> Arc<PortSpec> {
        Arc::new(
            PortSpec::new("wg", 2., (-1., 1.), 1, 2., [PathProfile::new(1., 0., (1, 0))])
                .unwrap(),
        )
    }

    #[test]
    fn angles_wrap_to_signed_range() {
        assert_eq!(Port::new((0., 0.), 180., spec(), false).angle(), -180.);
        assert_eq!(Port::new((0., 0.), 270., spec(), false).angle(), -90.);
    }

    #[test]
    fn reflection_toggles_inverted() {
        let port = Port::new((1., 2.), 30., spec(), false);
        let reflected = port.clone().transform(Transformation::reflect_vert());
        assert!(reflected.inverted());
        assert_abs_diff_eq!(reflected.angle(), -30., epsilon = 1e-9);
        assert_abs_diff_eq!(reflected.center(), Point::new(1., -2.));
        let rotated = port.transform(Transformation::rotate(90.));
        assert!(!rotated.inverted());
        assert_abs_diff_eq!(rotated.angle(), 120., epsilon = 1e-9);
    }
}
