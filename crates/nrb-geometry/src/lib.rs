//! NRB kernel geometry: knot spans, basis functions, B-spline curves and
//! rational surface derivatives.

pub mod curve;
pub mod nurbs;
pub mod surface;

pub use curve::BSplineCurve;
pub use surface::{NurbsSurface, SurfaceDerivativeEvaluator};
