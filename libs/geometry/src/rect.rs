//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::transform::TranslateMut;

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle with corners `(left, bot), (right, top)`.
    ///
    /// # Panics
    ///
    /// Panics if `left > right` or `bot > top`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(10., 20., 30., 40.);
    /// assert_eq!(rect.width(), 20.);
    /// ```
    #[inline]
    pub fn from_sides(left: f64, bot: f64, right: f64, top: f64) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Creates a rectangle with corners `(left, bot), (right, top)`,
    /// returning [`None`] if the sides are out of order.
    #[inline]
    pub fn from_sides_option(left: f64, bot: f64, right: f64, top: f64) -> Option<Self> {
        if left > right || bot > top {
            None
        } else {
            Some(Self::from_sides(left, bot, right, top))
        }
    }

    /// Creates a rectangle from two diagonally opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_sides(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Creates a rectangle of the given size centered at `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::from_corners(
            Point::new(center.x - width / 2., center.y - height / 2.),
            Point::new(center.x + width / 2., center.y + height / 2.),
        )
    }

    /// The left edge of the rectangle.
    #[inline]
    pub fn left(&self) -> f64 {
        self.p0.x
    }

    /// The bottom edge of the rectangle.
    #[inline]
    pub fn bot(&self) -> f64 {
        self.p0.y
    }

    /// The right edge of the rectangle.
    #[inline]
    pub fn right(&self) -> f64 {
        self.p1.x
    }

    /// The top edge of the rectangle.
    #[inline]
    pub fn top(&self) -> f64 {
        self.p1.y
    }

    /// The lower-left corner.
    #[inline]
    pub fn lower_left(&self) -> Point {
        self.p0
    }

    /// The upper-right corner.
    #[inline]
    pub fn upper_right(&self) -> Point {
        self.p1
    }

    /// The horizontal extent of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    /// The vertical extent of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// The center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2., (self.p0.y + self.p1.y) / 2.)
    }

    /// The area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self::from_sides(
            self.left().min(other.left()),
            self.bot().min(other.bot()),
            self.right().max(other.right()),
            self.top().max(other.top()),
        )
    }

    /// Expands the rectangle by `amount` on every side.
    pub fn expand_all(self, amount: f64) -> Self {
        Self::from_corners(
            Point::new(self.left() - amount, self.bot() - amount),
            Point::new(self.right() + amount, self.top() + amount),
        )
    }

    /// Returns `true` if `p` lies inside or on the boundary of the rectangle.
    pub fn contains_point(&self, p: Point) -> bool {
        self.left() <= p.x && p.x <= self.right() && self.bot() <= p.y && p.y <= self.top()
    }

    /// The corners of the rectangle, counterclockwise from the lower left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.p0,
            Point::new(self.p1.x, self.p0.y),
            self.p1,
            Point::new(self.p0.x, self.p1.y),
        ]
    }

    /// Converts the rectangle to a counterclockwise [`Polygon`].
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_verts(self.corners().to_vec())
    }
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl TranslateMut for Rect {
    fn translate_mut(&mut self, p: Point) {
        self.p0.translate_mut(p);
        self.p1.translate_mut(p);
    }
}
