//! Waveguide paths: centerlines with a width profile.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::rect::Rect;
use crate::transform::{TransformMut, Transformation, TranslateMut};

/// Number of centerline samples for an arc of up to 90 degrees.
const ARC_SAMPLES: usize = 64;
/// Integration steps used to trace the Euler curvature profile of one sub-bend.
const EULER_STEPS: usize = 256;
/// Number of centerline samples for a Bezier curve.
const BEZIER_SAMPLES: usize = 64;
/// Points closer than this are considered coincident.
const EPSILON: f64 = 1e-9;

/// A path with a (possibly varying) width, offset laterally from its centerline.
///
/// Built incrementally from a starting point by appending straight segments,
/// arcs and Bezier curves. A positive offset shifts the strip to the left of the
/// direction of travel.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// # use approx::assert_abs_diff_eq;
/// let mut path = Path::new(Point::zero(), 2.);
/// path.segment(Point::new(10., 0.), None);
/// assert_abs_diff_eq!(path.to_polygon().area(), 20., epsilon = 1e-9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Path {
    offset: f64,
    points: Vec<Point>,
    widths: Vec<f64>,
}

impl Path {
    /// Creates a path starting at `origin` with the given width.
    pub fn new(origin: Point, width: f64) -> Self {
        Self::with_offset(origin, width, 0.)
    }

    /// Creates a path starting at `origin` whose strip is shifted laterally by `offset`.
    pub fn with_offset(origin: Point, width: f64, offset: f64) -> Self {
        Self {
            offset,
            points: vec![origin],
            widths: vec![width],
        }
    }

    /// The lateral offset of the strip.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The centerline vertices.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The current end point of the centerline.
    pub fn end_point(&self) -> Point {
        // A path always holds its origin.
        self.points[self.points.len() - 1]
    }

    /// The current width at the end of the path.
    pub fn end_width(&self) -> f64 {
        self.widths[self.widths.len() - 1]
    }

    /// The direction of travel at the end of the path in degrees,
    /// or [`None`] if the path has no extent yet.
    pub fn end_heading(&self) -> Option<f64> {
        let end = self.end_point();
        self.points
            .iter()
            .rev()
            .find(|p| p.distance(end) > EPSILON)
            .map(|p| (end - *p).angle())
    }

    /// The length of the centerline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    fn push(&mut self, p: Point, width: f64) {
        if p.distance(self.end_point()) > EPSILON {
            self.points.push(p);
            self.widths.push(width);
        } else {
            let last = self.widths.len() - 1;
            self.widths[last] = width;
        }
    }

    /// Appends a straight segment to `end`.
    ///
    /// If `width` is given, the width changes linearly to it along the segment.
    pub fn segment(&mut self, end: impl Into<Point>, width: Option<f64>) -> &mut Self {
        let width = width.unwrap_or_else(|| self.end_width());
        self.push(end.into(), width);
        self
    }

    /// Appends a circular or Euler arc.
    ///
    /// `initial_angle` and `final_angle` are the angular positions, in degrees, of the
    /// start and end of the arc on a circle of the given `radius`; the arc turns
    /// counterclockwise if `final_angle > initial_angle`. The path's current end lies at
    /// `initial_angle` on that circle.
    ///
    /// `euler_fraction` in `[0, 1]` is the fraction of every bend (of at most 90 degrees)
    /// whose curvature ramps linearly, half at each end. `0` yields a circular arc.
    /// The sampled arc ends exactly where the circular arc would, or at `endpoint` if
    /// given, in which case the arc is mapped by a similarity transform fixing its start.
    pub fn arc(
        &mut self,
        initial_angle: f64,
        final_angle: f64,
        radius: f64,
        euler_fraction: f64,
        endpoint: Option<Point>,
    ) -> &mut Self {
        let sweep = final_angle - initial_angle;
        if sweep.abs() < EPSILON || radius <= 0. {
            if let Some(endpoint) = endpoint {
                self.push(endpoint, self.end_width());
            }
            return self;
        }
        let turn = sweep.signum();
        let euler_fraction = euler_fraction.clamp(0., 1.);
        let width = self.end_width();
        let start = self.end_point();

        let num_bends = (sweep.abs() / 90.).ceil().max(1.) as usize;
        let delta = sweep / num_bends as f64;
        let mut heading = initial_angle + 90. * turn;
        let mut current = start;
        let mut arc = vec![start];
        for _ in 0..num_bends {
            let chord_length = 2. * radius * (delta.abs().to_radians() / 2.).sin();
            let chord = Point::unit(heading + delta / 2.) * chord_length;
            let local: Vec<Point> = euler_bend(delta, euler_fraction)
                .into_iter()
                .map(|q| rotate_vector(q, heading))
                .collect();
            let map = similarity(local[local.len() - 1], chord);
            for q in &local[1..] {
                arc.push(current + map(*q));
            }
            current = current + chord;
            heading += delta;
        }

        if let Some(endpoint) = endpoint {
            let reached = arc[arc.len() - 1] - start;
            let map = similarity(reached, endpoint - start);
            for p in arc.iter_mut() {
                *p = start + map(*p - start);
            }
        }

        for p in arc.into_iter().skip(1) {
            self.push(p, width);
        }
        self
    }

    /// Appends a Bezier curve through the given control points.
    ///
    /// The current end of the path is the first control point. If `relative` is set,
    /// the control points are offsets from the current end.
    pub fn bezier(&mut self, controls: &[Point], relative: bool) -> &mut Self {
        let start = self.end_point();
        let mut ctrl = Vec::with_capacity(controls.len() + 1);
        ctrl.push(start);
        ctrl.extend(
            controls
                .iter()
                .map(|p| if relative { start + *p } else { *p }),
        );
        let width = self.end_width();
        for i in 1..=BEZIER_SAMPLES {
            let t = i as f64 / BEZIER_SAMPLES as f64;
            self.push(de_casteljau(&ctrl, t), width);
        }
        self
    }

    /// The polygon covered by the path.
    ///
    /// Interior vertices use mitered joins. The polygon is oriented counterclockwise.
    pub fn to_polygon(&self) -> Polygon {
        let n = self.points.len();
        if n < 2 {
            return Polygon::default();
        }
        let normals: Vec<Point> = self
            .points
            .windows(2)
            .map(|w| {
                let d = w[1] - w[0];
                (d * (1. / d.norm())).perp()
            })
            .collect();
        let miter = |i: usize| -> Point {
            if i == 0 {
                normals[0]
            } else if i == n - 1 {
                normals[n - 2]
            } else {
                let (n1, n2) = (normals[i - 1], normals[i]);
                let denom = 1. + n1.dot(n2);
                if denom < 0.1 {
                    n2
                } else {
                    (n1 + n2) * (1. / denom)
                }
            }
        };
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        for i in 0..n {
            let m = miter(i);
            let half = self.widths[i] / 2.;
            left.push(self.points[i] + m * (self.offset + half));
            right.push(self.points[i] + m * (self.offset - half));
        }
        right.reverse();
        left.extend(right);
        Polygon::from_verts(left).oriented_ccw()
    }
}

fn rotate_vector(p: Point, angle: f64) -> Point {
    Transformation::rotate(angle).apply_vector(p)
}

/// Returns the similarity map (rotation and uniform scaling) sending `from` to `to`.
fn similarity(from: Point, to: Point) -> impl Fn(Point) -> Point {
    let norm = from.dot(from);
    let (c, s) = if norm > 0. {
        (from.dot(to) / norm, from.cross(to) / norm)
    } else {
        (1., 0.)
    };
    move |p: Point| Point::new(c * p.x - s * p.y, s * p.x + c * p.y)
}

/// Integrated heading of the symmetric curvature profile at normalized length `t`.
///
/// `ramp` is the normalized length of each linear curvature ramp.
fn euler_heading(t: f64, ramp: f64) -> f64 {
    if ramp <= 0. {
        return t;
    }
    let total = 1. - ramp;
    let f = if t <= ramp {
        t * t / (2. * ramp)
    } else if t <= 1. - ramp {
        ramp / 2. + (t - ramp)
    } else {
        let u = t - (1. - ramp);
        ramp / 2. + (1. - 2. * ramp) + u - u * u / (2. * ramp)
    };
    f / total
}

/// Samples a bend of `delta` degrees starting at the origin heading along +x.
fn euler_bend(delta: f64, euler_fraction: f64) -> Vec<Point> {
    let ramp = euler_fraction / 2.;
    let dt = 1. / EULER_STEPS as f64;
    let stride = EULER_STEPS / ARC_SAMPLES;
    let mut samples = Vec::with_capacity(ARC_SAMPLES + 1);
    let mut pos = Point::zero();
    samples.push(pos);
    for i in 0..EULER_STEPS {
        let t = (i as f64 + 0.5) * dt;
        pos += Point::unit(delta * euler_heading(t, ramp)) * dt;
        if (i + 1) % stride == 0 {
            samples.push(pos);
        }
    }
    samples
}

fn de_casteljau(ctrl: &[Point], t: f64) -> Point {
    let mut pts = ctrl.to_vec();
    for k in (1..pts.len()).rev() {
        for i in 0..k {
            pts[i] = pts[i] * (1. - t) + pts[i + 1] * t;
        }
    }
    pts[0]
}

impl Bbox for Path {
    fn bbox(&self) -> Option<Rect> {
        self.to_polygon().bbox()
    }
}

impl TranslateMut for Path {
    fn translate_mut(&mut self, p: Point) {
        self.points.translate_mut(p);
    }
}

impl TransformMut for Path {
    fn transform_mut(&mut self, trans: Transformation) {
        self.points.transform_mut(trans);
        if trans.is_reflection() {
            self.offset = -self.offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn segment_with_width_change_is_a_trapezoid() {
        let mut path = Path::new(Point::new(-5., 0.), 1.);
        path.segment(Point::new(0., 0.), Some(3.));
        assert_abs_diff_eq!(path.to_polygon().area(), 10., epsilon = 1e-9);
    }

    #[test]
    fn circular_quarter_arc_hits_circle() {
        let mut path = Path::new(Point::zero(), 1.);
        path.arc(-90., 0., 10., 0., None);
        assert_abs_diff_eq!(path.end_point(), Point::new(10., 10.), epsilon = 1e-9);
        let center = Point::new(0., 10.);
        for p in path.points() {
            assert_abs_diff_eq!(p.distance(center), 10., epsilon = 1e-3);
        }
        assert_abs_diff_eq!(path.end_heading().unwrap(), 90., epsilon = 1.);
    }

    #[test]
    fn euler_u_turn_stays_within_radius() {
        let mut path = Path::new(Point::zero(), 1.);
        path.arc(-90., 90., 40., 1., Some(Point::new(0., 80.)));
        assert_abs_diff_eq!(path.end_point(), Point::new(0., 80.), epsilon = 1e-9);
        let max_x = path.points().iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_x = path.points().iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert!(max_x <= 40. + 1e-9, "max x {max_x}");
        assert!(min_x >= -1e-9, "min x {min_x}");
    }

    #[test]
    fn clockwise_arc() {
        let mut path = Path::new(Point::zero(), 1.);
        path.arc(90., -90., 5., 0.5, None);
        assert_abs_diff_eq!(path.end_point(), Point::new(0., -10.), epsilon = 1e-9);
    }

    #[test]
    fn bezier_ends_on_last_control() {
        let mut path = Path::new(Point::new(1., 1.), 1.);
        path.bezier(
            &[
                Point::new(10., 0.),
                Point::new(20., 5.),
                Point::new(30., 5.),
            ],
            true,
        );
        assert_abs_diff_eq!(path.end_point(), Point::new(31., 6.), epsilon = 1e-12);
        assert_abs_diff_eq!(path.end_heading().unwrap(), 0., epsilon = 1.);
    }

    #[test]
    fn offset_strip_lies_to_the_left() {
        let mut path = Path::with_offset(Point::zero(), 2., 5.);
        path.segment(Point::new(10., 0.), None);
        assert_eq!(path.bbox(), Some(Rect::from_sides(0., 4., 10., 6.)));
    }
}
