//! Simple polygons with floating point vertices.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::rect::Rect;
use crate::transform::{TransformMut, Transformation, TranslateMut};

/// A simple polygon, given by its vertices.
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// Vector of points that make up the polygon.
    points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon with given vertices.
    pub fn from_verts(vec: Vec<Point>) -> Self {
        Self { points: vec }
    }

    /// A trapezoid tapering linearly along the x-axis.
    ///
    /// Starts at `x = 0` with width `widths.0` and ends at `x = length` with width `widths.1`,
    /// symmetric about the x-axis.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let taper = Polygon::linear_taper(10., (2., 4.));
    /// assert_eq!(taper.area(), 30.);
    /// ```
    pub fn linear_taper(length: f64, widths: (f64, f64)) -> Self {
        let (w0, w1) = (widths.0 / 2., widths.1 / 2.);
        Self::from_verts(vec![
            Point::new(0., -w0),
            Point::new(length, -w1),
            Point::new(length, w1),
            Point::new(0., w0),
        ])
    }

    /// Returns a the vector of points representing the polygon.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consumes the polygon, returning its vertices.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// The signed area of the polygon.
    ///
    /// Positive for counterclockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.;
        }
        let twice: f64 = (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum();
        twice / 2.
    }

    /// The area enclosed by the polygon.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let tri = Polygon::from_verts(vec![
    ///     Point::new(0., 0.),
    ///     Point::new(0., 2.),
    ///     Point::new(2., 0.),
    /// ]);
    /// assert_eq!(tri.area(), 2.);
    /// ```
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Reorders the vertices counterclockwise if they are currently clockwise.
    pub fn oriented_ccw(mut self) -> Self {
        if self.signed_area() < 0. {
            self.points.reverse();
        }
        self
    }

    /// Returns `true` if `p` lies strictly inside the polygon (even-odd rule).
    pub fn contains_point(&self, p: Point) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

impl Bbox for Polygon {
    fn bbox(&self) -> Option<Rect> {
        let mut points = self.points.iter();
        let first = points.next()?;
        let (mut left, mut bot, mut right, mut top) = (first.x, first.y, first.x, first.y);
        for p in points {
            left = left.min(p.x);
            bot = bot.min(p.y);
            right = right.max(p.x);
            top = top.max(p.y);
        }
        Rect::from_sides_option(left, bot, right, top)
    }
}

impl TranslateMut for Polygon {
    fn translate_mut(&mut self, p: Point) {
        self.points.translate_mut(p);
    }
}

impl TransformMut for Polygon {
    fn transform_mut(&mut self, trans: Transformation) {
        self.points.transform_mut(trans);
        // Keep counterclockwise order under reflections.
        if trans.is_reflection() {
            self.points.reverse();
        }
    }
}

impl From<Rect> for Polygon {
    fn from(value: Rect) -> Self {
        value.to_polygon()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::transform::Transform;

    #[test]
    fn reflection_preserves_orientation() {
        let poly = Rect::from_sides(0., 0., 2., 1.).to_polygon();
        assert!(poly.signed_area() > 0.);
        let reflected = poly.transform(Transformation::reflect_vert());
        assert_abs_diff_eq!(reflected.signed_area(), 2.);
    }

    #[test]
    fn contains_point_even_odd() {
        let taper = Polygon::linear_taper(10., (2., 4.));
        assert!(taper.contains_point(Point::new(5., 1.4)));
        assert!(!taper.contains_point(Point::new(5., 1.6)));
        assert!(!taper.contains_point(Point::new(-0.1, 0.)));
    }

    #[test]
    fn bbox_of_taper() {
        let taper = Polygon::linear_taper(10., (2., 4.));
        assert_eq!(taper.bbox(), Some(Rect::from_sides(0., -2., 10., 2.)));
    }
}
