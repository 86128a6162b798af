//! Conversions between Cartesian points with weights and homogeneous points.

use crate::{HPoint, Point3};

/// Lift `p` with weight `w` to `(x·w, y·w, z·w, w)`.
pub fn to_homogeneous(p: Point3, w: f64) -> HPoint {
    (p * w).extend(w)
}

/// Project a homogeneous point back to R^3. A zero weight yields non-finite
/// coordinates.
pub fn from_homogeneous(h: HPoint) -> Point3 {
    h.truncate() / h.w
}
