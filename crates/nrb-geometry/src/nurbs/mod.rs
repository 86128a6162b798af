//! NURBS core algorithms: knot spans, basis functions, derivative control
//! points and rational unweighting.

pub mod deboor;
pub mod derivs;
pub mod knot;
pub mod rational;
pub mod tensor;

pub use deboor::{derivative_control_points, eval_points};
pub use derivs::{surface_derivatives, SampleBasis, TensorBasis};
pub use knot::{basis_function_matrix, basis_functions, find_span, find_spans, BasisVec};
pub use rational::unweight;
pub use tensor::{DerivIndex, DerivativeTensor, SPATIAL_DIM};
