//! Curve evaluation and derivative control points.

use nalgebra::DMatrix;
use nrb_core::{NrbError, Result};

use super::knot::{basis_functions, find_span};

/// Evaluate a B-spline curve at every parameter in `us`.
///
/// `control_points` is `(dim, nc)`: one column per control point. Returns a
/// `(dim, us.len())` matrix. Fails before evaluating anything when
/// `nc + degree != knots.len() - 1`.
pub fn eval_points(
    degree: usize,
    control_points: &DMatrix<f64>,
    knots: &[f64],
    us: &[f64],
) -> Result<DMatrix<f64>> {
    let (dim, nc) = control_points.shape();
    check_curve(degree, nc, knots)?;
    log::debug!(
        "evaluating degree {} curve ({}x{} control points) at {} parameters",
        degree,
        dim,
        nc,
        us.len()
    );

    let mut points = DMatrix::zeros(dim, us.len());
    for (col, &u) in us.iter().enumerate() {
        let span = find_span(nc - 1, degree, u, knots);
        let basis = basis_functions(span, u, degree, knots);
        let first = span - degree;
        for row in 0..dim {
            points[(row, col)] = basis
                .iter()
                .enumerate()
                .map(|(i, &n)| n * control_points[(row, first + i)])
                .sum();
        }
    }

    Ok(points)
}

/// Control points and knots of the derivative of a degree `degree` curve.
///
/// Returns `(dc, dk)` with `dc` of shape `(dim, nc - 1)` and `dk` the knot
/// vector without its first and last knot, together describing the
/// degree `degree - 1` derivative. The pair can be fed back in for higher
/// derivatives.
///
/// Modified version of Algorithm A3.3 from 'The NURBS Book'.
pub fn derivative_control_points(
    degree: usize,
    control_points: &DMatrix<f64>,
    knots: &[f64],
) -> Result<(DMatrix<f64>, Vec<f64>)> {
    check_curve(degree, control_points.ncols(), knots)?;
    Ok(reduce_control_points(degree, control_points, knots))
}

/// [`derivative_control_points`] without the count check.
pub(crate) fn reduce_control_points(
    degree: usize,
    control_points: &DMatrix<f64>,
    knots: &[f64],
) -> (DMatrix<f64>, Vec<f64>) {
    let (dim, nc) = control_points.shape();
    let mut dc = DMatrix::zeros(dim, nc.saturating_sub(1));

    // A piecewise constant has no derivative control net to speak of.
    if degree > 0 {
        let d = degree as f64;
        for i in 0..nc.saturating_sub(1) {
            let tmp = d / (knots[i + degree + 1] - knots[i + 1]);
            for j in 0..dim {
                dc[(j, i)] = tmp * (control_points[(j, i + 1)] - control_points[(j, i)]);
            }
        }
    }

    let dk = knots[1..knots.len() - 1].to_vec();
    (dc, dk)
}

fn check_curve(degree: usize, nc: usize, knots: &[f64]) -> Result<()> {
    if nc == 0 {
        return Err(NrbError::DimensionMismatch(
            "a B-spline needs at least one control point".into(),
        ));
    }
    NrbError::check_counts(degree, nc, knots.len())
}
