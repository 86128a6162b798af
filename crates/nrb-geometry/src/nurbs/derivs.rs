//! Partial derivatives of a tensor-product B-spline scalar field.
//!
//! Per sample only the `(p+1) x (q+1)` block of control values over the
//! active spans matters. That block is reduced along u with the curve
//! derivative control points (Algorithm A3.3) once per u-order, then along v
//! once per v-order, and each reduced net is contracted with the basis of
//! the matching reduced degree at the same spans. Together this is
//! Algorithms A3.7 and A3.8 from 'The NURBS Book'.

use nalgebra::DMatrix;
use nrb_core::{NrbError, Result};

use super::deboor::reduce_control_points;
use super::knot::{basis_functions, find_span, BasisVec};

/// Degrees and knot vectors of a tensor-product surface.
#[derive(Debug, Clone, Copy)]
pub struct TensorBasis<'a> {
    degree_u: usize,
    degree_v: usize,
    knots_u: &'a [f64],
    knots_v: &'a [f64],
    count_u: usize,
    count_v: usize,
}

/// Knot spans at one sample and the basis of every reduced degree there.
#[derive(Debug, Clone)]
pub struct SampleBasis {
    pub span_u: usize,
    pub span_v: usize,
    /// `basis_u[k]` holds the degree `p - k` basis at `span_u`.
    pub basis_u: Vec<BasisVec>,
    /// `basis_v[l]` holds the degree `q - l` basis at `span_v`.
    pub basis_v: Vec<BasisVec>,
    pub order: usize,
}

impl<'a> TensorBasis<'a> {
    /// Check both directions against the control grid shape.
    pub fn new(
        degree_u: usize,
        knots_u: &'a [f64],
        count_u: usize,
        degree_v: usize,
        knots_v: &'a [f64],
        count_v: usize,
    ) -> Result<Self> {
        if count_u == 0 || count_v == 0 {
            return Err(NrbError::DimensionMismatch(format!(
                "empty control grid ({count_u}x{count_v})"
            )));
        }
        NrbError::check_counts(degree_u, count_u, knots_u.len())?;
        NrbError::check_counts(degree_v, count_v, knots_v.len())?;
        Ok(Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            count_u,
            count_v,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.count_u, self.count_v)
    }

    /// Spans and reduced-degree basis vectors at `(u, v)` for derivatives up
    /// to order `d`.
    pub fn locate(&self, u: f64, v: f64, d: usize) -> SampleBasis {
        let (p, q) = (self.degree_u, self.degree_v);
        let span_u = find_span(self.count_u - 1, p, u, self.knots_u);
        let span_v = find_span(self.count_v - 1, q, v, self.knots_v);
        let basis_u = (0..=d.min(p))
            .map(|k| basis_functions(span_u, u, p - k, self.knots_u))
            .collect();
        let basis_v = (0..=d.min(q))
            .map(|l| basis_functions(span_v, v, q - l, self.knots_v))
            .collect();
        SampleBasis {
            span_u,
            span_v,
            basis_u,
            basis_v,
            order: d,
        }
    }

    /// `Aders`: entry `(k, l)` is the k-th u, l-th v partial of the field at
    /// the located sample. Entries with `k + l > d`, `k > p` or `l > q` are zero.
    ///
    /// `grid` is `(count_u, count_v)`, row = u control index.
    pub fn derivatives(&self, at: &SampleBasis, grid: &DMatrix<f64>) -> DMatrix<f64> {
        debug_assert_eq!(grid.shape(), self.shape());
        let (p, q, d) = (self.degree_u, self.degree_v, at.order);
        let r1 = at.span_u - p;
        let s1 = at.span_v - q;
        let local_u = &self.knots_u[r1..r1 + 2 * p + 2];
        let local_v = &self.knots_v[s1..s1 + 2 * q + 2];

        let mut aders = DMatrix::zeros(d + 1, d + 1);

        // Columns index u so the u-direction is the curve direction.
        let mut net_u: DMatrix<f64> = grid.view((r1, s1), (p + 1, q + 1)).transpose();
        let mut knots_u = local_u.to_vec();

        for k in 0..=d.min(p) {
            if k > 0 {
                (net_u, knots_u) = reduce_control_points(p - k + 1, &net_u, &knots_u);
            }

            // Rows index u again, columns index v.
            let mut net_v = net_u.transpose();
            let mut knots_v = local_v.to_vec();
            let nu = &at.basis_u[k];

            for l in 0..=(d - k).min(q) {
                if l > 0 {
                    (net_v, knots_v) = reduce_control_points(q - l + 1, &net_v, &knots_v);
                }
                let nv = &at.basis_v[l];

                let mut value = 0.0;
                for (j, &bu) in nu.iter().enumerate() {
                    let row: f64 = nv
                        .iter()
                        .enumerate()
                        .map(|(i, &bv)| bv * net_v[(j, i)])
                        .sum();
                    value += bu * row;
                }
                aders[(k, l)] = value;
            }
        }

        aders
    }
}

/// Partial derivatives up to order `d` of a single scalar field at `(u, v)`.
///
/// `grid` is `(mc, nc)` with row = u control index, column = v control index.
/// Returns the `(d + 1, d + 1)` matrix described in [`TensorBasis::derivatives`].
#[allow(clippy::too_many_arguments)]
pub fn surface_derivatives(
    degree_u: usize,
    knots_u: &[f64],
    degree_v: usize,
    knots_v: &[f64],
    grid: &DMatrix<f64>,
    u: f64,
    v: f64,
    d: usize,
) -> Result<DMatrix<f64>> {
    let basis = TensorBasis::new(
        degree_u,
        knots_u,
        grid.nrows(),
        degree_v,
        knots_v,
        grid.ncols(),
    )?;
    let at = basis.locate(u, v, d);
    Ok(basis.derivatives(&at, grid))
}
