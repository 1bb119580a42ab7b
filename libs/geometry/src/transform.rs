//! Transformation types and traits.

use impl_trait_for_tuples::impl_for_tuples;
use serde::{Deserialize, Serialize};

use super::orientation::Orientation;
use crate::point::Point;
use crate::wrap_angle;

/// A transformation representing translation, rotation, and reflection of geometry.
///
/// Rotations may be by any angle. This object does not support scaling of geometry,
/// so the matrix is always orthonormal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// The transformation matrix represented in row-major order.
    pub(crate) a: [[f64; 2]; 2],
    /// The x-y translation applied after the transformation.
    pub(crate) b: [f64; 2],
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// Returns the identity transform, leaving any transformed object unmodified.
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }

    /// Returns a translation by `(x,y)`.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }

    /// Returns a counterclockwise rotation by `angle` degrees about the origin.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = exact_sin_cos(angle);
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }

    /// Returns a counterclockwise rotation by `angle` degrees about `center`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use approx::assert_abs_diff_eq;
    /// let trans = Transformation::rotate_about(90., Point::new(1., 0.));
    /// assert_abs_diff_eq!(trans.apply(Point::new(2., 0.)), Point::new(1., 1.), epsilon = 1e-12);
    /// ```
    pub fn rotate_about(angle: f64, center: Point) -> Self {
        Self::cascade(
            Self::translate(center.x, center.y),
            Self::cascade(Self::rotate(angle), Self::translate(-center.x, -center.y)),
        )
    }

    /// Returns a reflection about the x-axis.
    pub fn reflect_vert() -> Self {
        Self {
            a: [[1., 0.], [0., -1.]],
            b: [0., 0.],
        }
    }

    /// Returns a new [`TransformationBuilder`].
    #[inline]
    pub fn builder() -> TransformationBuilder {
        TransformationBuilder::default()
    }

    /// Creates a transform from only an offset.
    pub fn from_offset(offset: Point) -> Self {
        Self::translate(offset.x, offset.y)
    }

    /// Creates a transform from an offset, angle, and a bool indicating
    /// whether or not to reflect vertically.
    pub fn from_opts(offset: Point, reflect_vert: bool, angle: f64) -> Self {
        Self::builder()
            .point(offset)
            .reflect_vert(reflect_vert)
            .angle(angle)
            .build()
    }

    /// Create a new [`Transformation`] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each layer of instance has a nested set of transformations relative to its top-level parent.
    ///
    /// Note this operation *is not* commutative.
    /// For example the set of transformations:
    /// * (a) Reflect vertically, then
    /// * (b) Translate by (1,1)
    /// * (c) Place a point at (local coordinate) (1,1)
    ///
    /// Lands said point at (2,-2) in top-level space,
    /// whereas reversing the order of (a) and (b) lands it at (2,0).
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        // The result-transform's origin is the parent's origin,
        // plus the parent-transformed child's origin
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }

    /// The point representing the translation of this transformation.
    pub fn offset_point(&self) -> Point {
        Point::new(self.b[0], self.b[1])
    }

    /// Returns `true` if this transformation mirrors geometry.
    #[inline]
    pub fn is_reflection(&self) -> bool {
        self.a[0][0] * self.a[1][1] - self.a[0][1] * self.a[1][0] < 0.
    }

    /// Returns an [`Orientation`] corresponding to this transformation.
    pub fn orientation(&self) -> Orientation {
        let reflect_vert = self.is_reflection();
        let angle = wrap_angle(self.a[1][0].atan2(self.a[0][0]).to_degrees());
        Orientation::from_reflect_and_angle(reflect_vert, angle)
    }

    /// Applies this transformation to a point.
    pub fn apply(&self, p: Point) -> Point {
        let v = matvec(&self.a, &[p.x, p.y]);
        Point::new(v[0] + self.b[0], v[1] + self.b[1])
    }

    /// Applies only the linear part of this transformation to a vector.
    pub fn apply_vector(&self, v: Point) -> Point {
        let v = matvec(&self.a, &[v.x, v.y]);
        Point::new(v[0], v[1])
    }

    /// Maps a direction angle, in degrees, through this transformation.
    ///
    /// The result lies in `[0, 360)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use approx::assert_abs_diff_eq;
    /// assert_abs_diff_eq!(Transformation::reflect_vert().apply_angle(30.), 330., epsilon = 1e-9);
    /// assert_abs_diff_eq!(Transformation::rotate(90.).apply_angle(300.), 30., epsilon = 1e-9);
    /// ```
    pub fn apply_angle(&self, angle: f64) -> f64 {
        let o = self.orientation();
        let angle = if o.reflect_vert() { -angle } else { angle };
        wrap_angle(angle + o.angle())
    }

    /// Returns the inverse [`Transformation`] of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use geometry::transform::Transformation;
    /// use approx::assert_relative_eq;
    ///
    /// let trans = Transformation::cascade(
    ///     Transformation::rotate(30.),
    ///     Transformation::translate(5., 10.),
    /// );
    /// let inv = trans.inv();
    ///
    /// assert_relative_eq!(Transformation::cascade(inv, trans), Transformation::identity(), epsilon = 1e-12);
    /// ```
    pub fn inv(&self) -> Transformation {
        // Orthonormal, so the inverse is the transpose.
        let a = [[self.a[0][0], self.a[1][0]], [self.a[0][1], self.a[1][1]]];
        let b = matvec(&a, &self.b);
        Self { a, b: [-b[0], -b[1]] }
    }
}

impl approx::AbsDiffEq for Transformation {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.a
            .iter()
            .flatten()
            .chain(self.b.iter())
            .zip(other.a.iter().flatten().chain(other.b.iter()))
            .all(|(x, y)| x.abs_diff_eq(y, epsilon))
    }
}

impl approx::RelativeEq for Transformation {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.a
            .iter()
            .flatten()
            .chain(self.b.iter())
            .zip(other.a.iter().flatten().chain(other.b.iter()))
            .all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
    }
}

impl From<Orientation> for Transformation {
    fn from(value: Orientation) -> Self {
        Self::builder().orientation(value).build()
    }
}

/// A builder for creating transformations from translations and [`Orientation`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationBuilder {
    x: f64,
    y: f64,
    reflect_vert: bool,
    angle: f64,
}

impl TransformationBuilder {
    /// Specifies the x-y translation encoded by the transformation.
    pub fn point(&mut self, point: impl Into<Point>) -> &mut Self {
        let point = point.into();
        self.x = point.x;
        self.y = point.y;
        self
    }

    /// Specifies the [`Orientation`] applied by this transformation.
    ///
    /// This overrides any angle and reflection settings previously applied.
    pub fn orientation(&mut self, o: impl Into<Orientation>) -> &mut Self {
        let o = o.into();
        self.reflect_vert = o.reflect_vert();
        self.angle = o.angle();
        self
    }

    /// Specifies the angle of rotation encoded by this transformation.
    pub fn angle(&mut self, angle: f64) -> &mut Self {
        self.angle = angle;
        self
    }

    /// Specifies whether the transformation results in a vertical reflection.
    pub fn reflect_vert(&mut self, reflect_vert: bool) -> &mut Self {
        self.reflect_vert = reflect_vert;
        self
    }

    /// Builds a [`Transformation`] from the specified parameters.
    ///
    /// The reflection is applied before the rotation.
    pub fn build(&mut self) -> Transformation {
        let (sin, cos) = exact_sin_cos(self.angle);
        let sin_refl = if self.reflect_vert { sin } else { -sin };
        let cos_refl = if self.reflect_vert { -cos } else { cos };
        Transformation {
            a: [[cos, sin_refl], [sin, cos_refl]],
            b: [self.x, self.y],
        }
    }
}

/// Sine and cosine of an angle in degrees, exact at multiples of 90 degrees.
fn exact_sin_cos(angle: f64) -> (f64, f64) {
    let wrapped = wrap_angle(angle);
    if wrapped == 0. {
        (0., 1.)
    } else if wrapped == 90. {
        (1., 0.)
    } else if wrapped == 180. {
        (0., -1.)
    } else if wrapped == 270. {
        (-1., 0.)
    } else {
        wrapped.to_radians().sin_cos()
    }
}

/// Multiples two 2x2 matrices, returning a new 2x2 matrix
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

/// Multiplies a 2x2 matrix by a 2-entry vector, returning a new 2-entry vector.
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}

/// A trait for specifying how an object is changed by a [`Transformation`].
#[impl_for_tuples(32)]
pub trait TransformMut {
    /// Applies matrix-vector [`Transformation`] `trans`.
    fn transform_mut(&mut self, trans: Transformation);
}

impl<T: TransformMut> TransformMut for Vec<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        for i in self.iter_mut() {
            i.transform_mut(trans);
        }
    }
}

impl<T: TransformMut> TransformMut for Option<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        if let Some(inner) = self.as_mut() {
            inner.transform_mut(trans);
        }
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
///
/// Takes in an owned copy of the shape and returns the transformed version.
pub trait Transform: TransformMut + Sized {
    /// Applies matrix-vector [`Transformation`] `trans`.
    ///
    /// Creates a new shape at a location equal to the transformation of the original.
    #[inline]
    fn transform(mut self, trans: Transformation) -> Self {
        self.transform_mut(trans);
        self
    }
}

impl<T: TransformMut + Sized> Transform for T {}

/// A trait for specifying how a shape is translated by a [`Point`].
#[impl_for_tuples(32)]
pub trait TranslateMut {
    /// Translates the shape by [`Point`], modifying it in place.
    fn translate_mut(&mut self, p: Point);
}

impl<T: TranslateMut> TranslateMut for Vec<T> {
    fn translate_mut(&mut self, p: Point) {
        for i in self.iter_mut() {
            i.translate_mut(p);
        }
    }
}

/// A trait for specifying how a shape is translated by a [`Point`].
///
/// Takes in an owned copy of the shape and returns the translated version.
pub trait Translate: TranslateMut + Sized {
    /// Translates the shape by a [`Point`] through polymorphism.
    ///
    /// Creates a new shape at a location equal to the translation of the original.
    #[inline]
    fn translate(mut self, p: Point) -> Self {
        self.translate_mut(p);
        self
    }
}

impl<T: TranslateMut + Sized> Translate for T {}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn matvec_works() {
        let a = [[1., 2.], [3., 4.]];
        let b = [5., 6.];
        assert_eq!(matvec(&a, &b), [17., 39.]);
    }

    #[test]
    fn matmul_works() {
        let a = [[1., 2.], [3., 4.]];
        let b = [[5., 6.], [7., 8.]];
        assert_eq!(matmul(&a, &b), [[19., 22.], [43., 50.]]);
    }

    #[test]
    fn cascade_identity_preserves_transformation() {
        for reflect_vert in [false, true] {
            for angle in [0., 17., 90., 133.5, 180., 270., 359.] {
                let tf = Transformation::from_opts(Point::new(520., 130.), reflect_vert, angle);
                let casc = Transformation::cascade(tf, Transformation::identity());
                assert_relative_eq!(casc, tf, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn cascade_reflect_then_translate() {
        let tf = Transformation::cascade(
            Transformation::reflect_vert(),
            Transformation::translate(1., 1.),
        );
        assert_abs_diff_eq!(tf.apply(Point::new(1., 1.)), Point::new(2., -2.));
        let tf = Transformation::cascade(
            Transformation::translate(1., 1.),
            Transformation::reflect_vert(),
        );
        assert_abs_diff_eq!(tf.apply(Point::new(1., 1.)), Point::new(2., 0.));
    }

    #[test]
    fn orientation_round_trips() {
        for reflect_vert in [false, true] {
            for angle in [0., 45., 90., 200., 315.] {
                let tf = Transformation::from_opts(Point::zero(), reflect_vert, angle);
                let o = tf.orientation();
                assert_eq!(o.reflect_vert(), reflect_vert);
                assert_abs_diff_eq!(o.angle(), angle, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn inverse_undoes_transformation() {
        let tf = Transformation::from_opts(Point::new(-3., 8.), true, 63.);
        let p = Point::new(4.5, -1.25);
        assert_abs_diff_eq!(tf.inv().apply(tf.apply(p)), p, epsilon = 1e-12);
    }

    #[test]
    fn right_angle_rotations_are_exact() {
        let p = Transformation::rotate(90.).apply(Point::new(3., 0.));
        assert_eq!(p, Point::new(0., 3.));
        let p = Transformation::rotate(-180.).apply(Point::new(3., 1.));
        assert_eq!(p, Point::new(-3., -1.));
    }
}
