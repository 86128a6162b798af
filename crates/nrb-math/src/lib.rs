pub mod binomial;
pub mod homogeneous;

pub use glam::{DVec2, DVec3, DVec4};
pub use binomial::BinomialTable;
pub use homogeneous::{from_homogeneous, to_homogeneous};

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
/// Weighted point `(x·w, y·w, z·w, w)`.
pub type HPoint = DVec4;
