//! Utilities and types for orienting layout objects.

use serde::{Deserialize, Serialize};

use crate::transform::Transformation;
use crate::wrap_angle;

/// An orientation of a geometric object.
///
/// Captures reflection and rotation, but not position or scaling.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Orientation {
    /// Reflect vertically.
    ///
    /// Applied before rotation.
    pub(crate) reflect_vert: bool,
    /// Counter-clockwise angle in degrees.
    ///
    /// Applied after reflecting vertically.
    pub(crate) angle: f64,
}

impl Orientation {
    /// Creates a new orientation with the given reflection and angle settings.
    #[inline]
    pub fn from_reflect_and_angle(reflect_vert: bool, angle: f64) -> Self {
        Self {
            reflect_vert,
            angle,
        }
    }

    /// Returns the identity orientation with `reflect_vert = false` and `angle = 0.`.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Whether this orientation reflects vertically before rotating.
    #[inline]
    pub fn reflect_vert(&self) -> bool {
        self.reflect_vert
    }

    /// The counterclockwise rotation of this orientation, in degrees.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Applies the reflection and rotation specified in
    /// [`Orientation`] `o` to this orientation.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let o = Orientation::from_reflect_and_angle(false, 30.).reflected_vert();
    /// assert_eq!(o, Orientation::from_reflect_and_angle(true, 330.));
    /// ```
    pub fn apply(mut self, o: impl Into<Orientation>) -> Self {
        let o = o.into();
        if o.reflect_vert {
            self.reflect_vert = !self.reflect_vert;
            self.angle = o.angle - self.angle;
        } else {
            self.angle += o.angle;
        }
        self.wrap_angle()
    }

    /// Reflects the orientation vertically.
    #[inline]
    pub fn reflected_vert(self) -> Self {
        self.apply(Orientation::from_reflect_and_angle(true, 0.))
    }

    /// Rotates the orientation counterclockwise by `angle` degrees.
    #[inline]
    pub fn rotated(self, angle: f64) -> Self {
        self.apply(Orientation::from_reflect_and_angle(false, angle))
    }

    /// Wraps the angle of this orientation to the interval `[0, 360)`.
    pub fn wrap_angle(mut self) -> Self {
        self.angle = wrap_angle(self.angle);
        self
    }

    /// Returns the orientation encoded by the given transformation.
    pub fn from_transformation(value: Transformation) -> Self {
        value.orientation()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::point::Point;

    #[test]
    fn apply_matches_transformation_cascade() {
        for (r1, a1) in [(false, 10.), (true, 75.)] {
            for (r2, a2) in [(false, 200.), (true, 33.)] {
                let o1 = Orientation::from_reflect_and_angle(r1, a1);
                let o2 = Orientation::from_reflect_and_angle(r2, a2);
                let tf = Transformation::cascade(
                    Transformation::from_opts(Point::zero(), r2, a2),
                    Transformation::from_opts(Point::zero(), r1, a1),
                );
                let applied = o1.apply(o2);
                let expected = tf.orientation();
                assert_eq!(applied.reflect_vert(), expected.reflect_vert());
                assert_abs_diff_eq!(applied.angle(), expected.angle(), epsilon = 1e-9);
            }
        }
    }
}
