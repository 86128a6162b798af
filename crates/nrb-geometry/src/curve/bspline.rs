//! B-spline curve record.

use nalgebra::DMatrix;
use nrb_core::traits::Validate;
use nrb_core::{NrbError, Result, Tolerance};
use serde::{Deserialize, Serialize};

use crate::nurbs::deboor;

/// A B-spline curve defined by degree, knot vector, and control points.
///
/// `control_points` is `(dim, n)` with one column per control point. Weighted
/// curves store homogeneous coordinates in the extra row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineCurve {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: DMatrix<f64>,
}

impl BSplineCurve {
    pub fn new(degree: usize, knots: Vec<f64>, control_points: DMatrix<f64>) -> Self {
        debug_assert!(
            knots.len() == control_points.ncols() + degree + 1,
            "Knot vector length must be n + p + 1, got {} knots for {} CPs with degree {}",
            knots.len(),
            control_points.ncols(),
            degree
        );
        Self {
            degree,
            knots,
            control_points,
        }
    }

    pub fn dim(&self) -> usize {
        self.control_points.nrows()
    }

    /// Points at each parameter, as a `(dim, us.len())` matrix.
    pub fn evaluate(&self, us: &[f64]) -> Result<DMatrix<f64>> {
        deboor::eval_points(self.degree, &self.control_points, &self.knots, us)
    }

    /// The degree `p - 1` curve that is this curve's first derivative.
    pub fn derivative(&self) -> Result<Self> {
        let (control_points, knots) =
            deboor::derivative_control_points(self.degree, &self.control_points, &self.knots)?;
        Ok(Self {
            degree: self.degree.saturating_sub(1),
            knots,
            control_points,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        let p = self.degree;
        (self.knots[p], self.knots[self.knots.len() - p - 1])
    }
}

impl Validate for BSplineCurve {
    fn validate(&self) -> Result<()> {
        if self.control_points.ncols() == 0 {
            return Err(NrbError::DimensionMismatch(
                "a B-spline needs at least one control point".into(),
            ));
        }
        NrbError::check_counts(self.degree, self.control_points.ncols(), self.knots.len())?;
        let tol = Tolerance::default();
        if let Some(i) = self
            .knots
            .windows(2)
            .position(|w| !tol.knots_ordered(w[0], w[1]))
        {
            return Err(NrbError::InvalidKnots(format!(
                "knots decrease at index {}",
                i + 1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parabola() -> BSplineCurve {
        // (t, t^2) on [0, 2] with an interior knot at 1
        BSplineCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0],
            DMatrix::from_row_slice(2, 4, &[0.0, 0.5, 1.5, 2.0, 0.0, 0.0, 2.0, 4.0]),
        )
    }

    #[test]
    fn test_evaluate_parabola() {
        let curve = parabola();
        curve.validate().unwrap();
        let ts = [0.0, 0.4, 1.0, 1.7, 2.0];
        let p = curve.evaluate(&ts).unwrap();
        for (col, &t) in ts.iter().enumerate() {
            assert_abs_diff_eq!(p[(0, col)], t, epsilon = 1e-12);
            assert_abs_diff_eq!(p[(1, col)], t * t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_curve() {
        let curve = parabola();
        let d1 = curve.derivative().unwrap();
        assert_eq!(d1.degree, 1);
        assert_eq!(d1.domain(), (0.0, 2.0));
        let ts = [0.0, 0.5, 1.25, 2.0];
        let p = d1.evaluate(&ts).unwrap();
        for (col, &t) in ts.iter().enumerate() {
            assert_abs_diff_eq!(p[(0, col)], 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p[(1, col)], 2.0 * t, epsilon = 1e-12);
        }
        let d2 = d1.derivative().unwrap();
        let p = d2.evaluate(&[0.3, 1.9]).unwrap();
        assert_abs_diff_eq!(p[(1, 0)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[(1, 1)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_domain() {
        let curve = BSplineCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0],
            DMatrix::zeros(3, 5),
        );
        assert_eq!(curve.domain(), (0.0, 3.0));
        assert_eq!(curve.dim(), 3);
    }

    #[test]
    fn test_validate_rejects_decreasing_knots() {
        let curve = BSplineCurve {
            degree: 1,
            knots: vec![0.0, 0.0, 1.0, 0.5, 1.0],
            control_points: DMatrix::zeros(2, 3),
        };
        assert!(matches!(curve.validate(), Err(NrbError::InvalidKnots(_))));
    }
}
