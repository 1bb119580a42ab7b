//! 2-D geometric operations for photonic layout.
//!
//! Coordinates are `f64` micrometers and angles are degrees.
//!
//! # Examples
//!
//! Trace a waveguide bend and convert it to a polygon:
//!
//! ```
//! # use geometry::prelude::*;
//! let mut path = Path::new(Point::zero(), 1.);
//! path.segment(Point::new(5., 0.), None)
//!     .arc(-90., 0., 10., 0.5, None);
//! let polygon = path.to_polygon();
//! assert!(polygon.area() > 0.);
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod bbox;
pub mod orientation;
pub mod path;
pub mod point;
pub mod polygon;
pub mod prelude;
pub mod rect;
pub mod region;
pub mod shape;
pub mod transform;

/// Wraps the given angle to the interval `[0, 360)` degrees.
///
/// # Examples
///
/// ```
/// use geometry::wrap_angle;
///
/// assert_eq!(wrap_angle(10.), 10.);
/// assert_eq!(wrap_angle(-10.), 350.);
/// assert_eq!(wrap_angle(-740.), 340.);
/// assert_eq!(wrap_angle(725.), 5.);
/// assert_eq!(wrap_angle(360.), 0.);
/// assert_eq!(wrap_angle(-360.), 0.);
/// ```
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = ((angle % 360.) + 360.) % 360.;
    // `-1e-17 % 360 + 360` rounds to exactly 360.
    if wrapped >= 360. {
        0.
    } else {
        wrapped
    }
}

/// Wraps the given angle to the interval `[-180, 180)` degrees.
///
/// # Examples
///
/// ```
/// use geometry::wrap_angle_signed;
///
/// assert_eq!(wrap_angle_signed(180.), -180.);
/// assert_eq!(wrap_angle_signed(270.), -90.);
/// assert_eq!(wrap_angle_signed(-190.), 170.);
/// assert_eq!(wrap_angle_signed(90.), 90.);
/// ```
pub fn wrap_angle_signed(angle: f64) -> f64 {
    wrap_angle(angle + 180.) - 180.
}
