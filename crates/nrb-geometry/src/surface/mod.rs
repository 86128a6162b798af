//! Rational surfaces in homogeneous form and their derivative evaluator.

mod evaluator;
mod nurbs;

pub use evaluator::SurfaceDerivativeEvaluator;
pub use nurbs::NurbsSurface;
