//! Knot span location and B-spline basis functions.

use nalgebra::DMatrix;
use smallvec::{smallvec, SmallVec};

/// The `degree + 1` non-vanishing basis values at one span. Inline up to
/// degree 7.
pub type BasisVec = SmallVec<[f64; 8]>;

/// Find the knot span index for parameter `u`.
///
/// Returns `span` such that `knots[span] <= u < knots[span + 1]`. The upper
/// end of the domain, `u == knots[n + 1]`, belongs to the last span `n`.
/// Parameters outside `[knots[degree], knots[n + 1]]` are clamped to the
/// first or last span.
///
/// # Arguments
/// * `n` - Number of control points minus 1
/// * `degree` - Degree of the B-spline
/// * `u` - Parameter value
/// * `knots` - The knot vector, `n + degree + 2` non-decreasing values
///
/// Algorithm A2.1 from 'The NURBS Book'.
pub fn find_span(n: usize, degree: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[n + 1] {
        return n;
    }
    if u < knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// [`find_span`] for every parameter in `us`.
pub fn find_spans(n: usize, degree: usize, us: &[f64], knots: &[f64]) -> Vec<usize> {
    us.iter().map(|&u| find_span(n, degree, u, knots)).collect()
}

/// Compute the non-vanishing basis functions at parameter `u`.
///
/// Returns `N[span-degree, degree](u) ..= N[span, degree](u)`. The values are
/// non-negative and sum to one. Coincident knots bounding a non-empty span
/// give a zero denominator; the knot vector is assumed to be well formed.
///
/// Algorithm A2.2 from 'The NURBS Book'.
pub fn basis_functions(span: usize, u: f64, degree: usize, knots: &[f64]) -> BasisVec {
    let mut n: BasisVec = smallvec![0.0; degree + 1];
    let mut left: BasisVec = smallvec![0.0; degree + 1];
    let mut right: BasisVec = smallvec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Basis functions for a batch of `(span, u)` pairs, one row per sample.
pub fn basis_function_matrix(
    spans: &[usize],
    us: &[f64],
    degree: usize,
    knots: &[f64],
) -> DMatrix<f64> {
    debug_assert_eq!(spans.len(), us.len());
    let mut b = DMatrix::zeros(us.len(), degree + 1);
    for (row, (&span, &u)) in spans.iter().zip(us).enumerate() {
        let n = basis_functions(span, u, degree, knots);
        for (col, value) in n.into_iter().enumerate() {
            b[(row, col)] = value;
        }
    }
    b
}
