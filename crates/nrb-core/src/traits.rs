use crate::error::Result;

/// Validate structural integrity of a spline record before evaluation.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
