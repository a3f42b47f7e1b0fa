//! Geometry primitives for ruler endpoints.
//!
//! Thin free-function wrappers over [`Point`] so callers that hold two
//! endpoints (rather than a ruler) can derive length and direction the
//! same way the registry does.

use crate::types::Point;

/// Euclidean distance between `a` and `b`. Never negative.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Direction of the segment `a -> b` in degrees (`atan2` convention,
/// y axis pointing down in image space).
///
/// Returns `0.0` when `a == b`.
#[must_use]
pub fn angle_degrees(a: Point, b: Point) -> f64 {
    a.angle_to(b)
}
