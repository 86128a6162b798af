use thiserror::Error;

#[derive(Debug, Error)]
pub enum NrbError {
    #[error(
        "inconsistent B-spline data: degree {degree} + {control_points} control points != {knots} knots - 1"
    )]
    InconsistentSpline {
        degree: usize,
        control_points: usize,
        knots: usize,
    },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Invalid knot vector: {0}")]
    InvalidKnots(String),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
}

impl NrbError {
    /// Check the `control_points + degree == knots - 1` rule shared by every
    /// evaluator entry point.
    pub fn check_counts(degree: usize, control_points: usize, knots: usize) -> Result<()> {
        if control_points + degree + 1 != knots {
            return Err(Self::InconsistentSpline {
                degree,
                control_points,
                knots,
            });
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, NrbError>;
