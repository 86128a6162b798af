//! Non-rational B-spline curves in any dimension.

mod bspline;

pub use bspline::BSplineCurve;
