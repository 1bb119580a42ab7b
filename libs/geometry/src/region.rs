//! Planar regions and boolean operations on them.

use geo::{Area, BooleanOps, Contains, Coord, LineString, MultiPolygon};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::rect::Rect;

/// A set of points in the plane, represented as polygons with holes.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// # use approx::assert_abs_diff_eq;
/// let a = Region::from_rect(Rect::from_sides(0., 0., 2., 2.));
/// let b = Region::from_rect(Rect::from_sides(1., 0., 3., 2.));
/// assert_abs_diff_eq!(a.union(&b).area(), 6., epsilon = 1e-9);
/// assert_abs_diff_eq!(a.xor(&b).area(), 4., epsilon = 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    inner: MultiPolygon<f64>,
}

impl Default for Region {
    fn default() -> Self {
        Self::empty()
    }
}

impl Region {
    /// The empty region.
    pub fn empty() -> Self {
        Self {
            inner: MultiPolygon::new(Vec::new()),
        }
    }

    /// The union of the given polygons.
    ///
    /// Degenerate polygons (fewer than 3 vertices or zero area) are ignored.
    pub fn from_polygons<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> Self {
        polygons
            .into_iter()
            .filter(|p| p.points().len() >= 3 && p.area() > 0.)
            .fold(Self::empty(), |acc, p| acc.union(&Self::from_polygon(p)))
    }

    /// The region covered by a single simple polygon.
    pub fn from_polygon(polygon: &Polygon) -> Self {
        let ring: Vec<Coord<f64>> = polygon
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        Self {
            inner: MultiPolygon::new(vec![geo::Polygon::new(LineString::new(ring), Vec::new())]),
        }
    }

    /// The region covered by a rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_polygon(&rect.to_polygon())
    }

    /// Returns `true` if the region covers no points.
    pub fn is_empty(&self) -> bool {
        self.inner.0.is_empty()
    }

    /// Points in either region.
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Self {
            inner: self.inner.union(&other.inner),
        }
    }

    /// Points in both regions.
    pub fn intersection(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        Self {
            inner: self.inner.intersection(&other.inner),
        }
    }

    /// Points in `self` but not in `other`.
    pub fn difference(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Self {
            inner: self.inner.difference(&other.inner),
        }
    }

    /// Points in exactly one of the two regions.
    pub fn xor(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Self {
            inner: self.inner.xor(&other.inner),
        }
    }

    /// The area of the region.
    pub fn area(&self) -> f64 {
        self.inner.unsigned_area()
    }

    /// Returns `true` if `p` lies in the interior of the region.
    pub fn contains_point(&self, p: Point) -> bool {
        self.inner.contains(&geo::Point::new(p.x, p.y))
    }

    /// The boundary rings of the region: every exterior ring, followed by its holes.
    pub fn rings(&self) -> Vec<Polygon> {
        let ring_to_polygon = |ring: &LineString<f64>| {
            let mut points: Vec<Point> = ring.coords().map(|c| Point::new(c.x, c.y)).collect();
            // Closed rings repeat their first vertex.
            if points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            Polygon::from_verts(points)
        };
        self.inner
            .0
            .iter()
            .flat_map(|poly| {
                std::iter::once(poly.exterior())
                    .chain(poly.interiors().iter())
                    .map(ring_to_polygon)
            })
            .collect()
    }
}

impl Bbox for Region {
    fn bbox(&self) -> Option<Rect> {
        self.inner
            .0
            .iter()
            .map(|poly| {
                Polygon::from_verts(
                    poly.exterior()
                        .coords()
                        .map(|c| Point::new(c.x, c.y))
                        .collect(),
                )
            })
            .collect::<Vec<_>>()
            .bbox()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn difference_makes_a_hole() {
        let outer = Region::from_rect(Rect::from_sides(0., 0., 10., 10.));
        let inner = Region::from_rect(Rect::from_sides(4., 4., 6., 6.));
        let ring = outer.difference(&inner);
        assert_abs_diff_eq!(ring.area(), 96., epsilon = 1e-9);
        assert!(!ring.contains_point(Point::new(5., 5.)));
        assert!(ring.contains_point(Point::new(1., 1.)));
        assert_eq!(ring.rings().len(), 2);
    }

    #[test]
    fn xor_with_self_is_empty() {
        let a = Region::from_polygons([&Polygon::linear_taper(10., (1., 3.))]);
        assert_abs_diff_eq!(a.xor(&a).area(), 0., epsilon = 1e-9);
    }

    #[test]
    fn degenerate_polygons_are_ignored() {
        let line = Polygon::from_verts(vec![Point::zero(), Point::new(1., 1.)]);
        assert!(Region::from_polygons([&line]).is_empty());
    }
}
