//! An enumeration of geometric shapes and their properties.

use serde::{Deserialize, Serialize};

use crate::{
    bbox::Bbox,
    path::Path,
    point::Point,
    polygon::Polygon,
    rect::Rect,
    transform::{Transform, TransformMut, Transformation, TranslateMut},
};

/// An enumeration of geometric shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A rectangle.
    Rect(Rect),
    /// A polygon.
    Polygon(Polygon),
    /// A path with a width profile.
    Path(Path),
}

impl Shape {
    /// If this shape is a rectangle, returns the contained rectangle.
    /// Otherwise, returns [`None`].
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// If this shape is a polygon, returns the contained polygon.
    /// Otherwise, returns [`None`].
    pub fn polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// The region covered by this shape, as a counterclockwise polygon.
    pub fn to_polygon(&self) -> Polygon {
        match self {
            Shape::Rect(rect) => rect.to_polygon(),
            Shape::Polygon(polygon) => polygon.clone().oriented_ccw(),
            Shape::Path(path) => path.to_polygon(),
        }
    }

    /// The enclosed area.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Rect(rect) => rect.area(),
            shape => shape.to_polygon().area(),
        }
    }
}

impl TranslateMut for Shape {
    fn translate_mut(&mut self, p: Point) {
        match self {
            Shape::Rect(rect) => rect.translate_mut(p),
            Shape::Polygon(polygon) => polygon.translate_mut(p),
            Shape::Path(path) => path.translate_mut(p),
        };
    }
}

impl TransformMut for Shape {
    fn transform_mut(&mut self, trans: Transformation) {
        match self {
            Shape::Rect(rect) => {
                let angle = trans.orientation().angle();
                let polygon = rect.to_polygon().transform(trans);
                *self = if angle % 90. == 0. {
                    match polygon.bbox() {
                        Some(bbox) => Shape::Rect(bbox),
                        None => Shape::Polygon(polygon),
                    }
                } else {
                    Shape::Polygon(polygon)
                };
            }
            Shape::Polygon(polygon) => polygon.transform_mut(trans),
            Shape::Path(path) => path.transform_mut(trans),
        }
    }
}

impl Bbox for Shape {
    fn bbox(&self) -> Option<Rect> {
        match self {
            Shape::Rect(rect) => rect.bbox(),
            Shape::Polygon(polygon) => polygon.bbox(),
            Shape::Path(path) => path.bbox(),
        }
    }
}

impl From<Rect> for Shape {
    #[inline]
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<Polygon> for Shape {
    #[inline]
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<Path> for Shape {
    #[inline]
    fn from(value: Path) -> Self {
        Self::Path(value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn rect_stays_rect_under_right_angle_rotation() {
        let shape = Shape::from(Rect::from_sides(0., 0., 2., 1.));
        let rotated = shape.clone().transform(Transformation::rotate(90.));
        assert_eq!(rotated.rect(), Some(Rect::from_sides(-1., 0., 0., 2.)));
        let tilted = shape.transform(Transformation::rotate(30.));
        assert!(tilted.polygon().is_some());
        assert_abs_diff_eq!(tilted.area(), 2., epsilon = 1e-12);
    }
}
