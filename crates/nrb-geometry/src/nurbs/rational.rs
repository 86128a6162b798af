//! Derivatives of a rational surface from the derivatives of its homogeneous
//! numerator and weight (Algorithm A4.4, 'The NURBS Book').

use nalgebra::DMatrix;
use nrb_math::BinomialTable;

/// Turn one coordinate's homogeneous derivatives into rational derivatives.
///
/// `aders[(k, l)]` are the partials of `x·w`, `wders[(k, l)]` those of `w`,
/// both at least `(d + 1, d + 1)`. Returns `skl` with `skl[(k, l)]` the k-th
/// u, l-th v partial of `x`, zero where `k + l > d`.
///
/// Entries are filled with `k` outer and `l` inner, each from already
/// finished lower orders. A zero `wders[(0, 0)]` is not checked and yields
/// non-finite output.
pub fn unweight(
    aders: &DMatrix<f64>,
    wders: &DMatrix<f64>,
    d: usize,
    binomials: &BinomialTable,
) -> DMatrix<f64> {
    let mut skl = DMatrix::zeros(d + 1, d + 1);
    let w = wders[(0, 0)];

    for k in 0..=d {
        for l in 0..=(d - k) {
            let mut v = aders[(k, l)];
            for j in 1..=l {
                v -= binomials.binom(l, j) * wders[(0, j)] * skl[(k, l - j)];
            }
            for r in 1..=k {
                let bin_kr = binomials.binom(k, r);
                v -= bin_kr * wders[(r, 0)] * skl[(k - r, l)];
                let mut v2 = 0.0;
                for j in 1..=l {
                    v2 += binomials.binom(l, j) * wders[(r, j)] * skl[(k - r, l - j)];
                }
                v -= bin_kr * v2;
            }
            skl[(k, l)] = v / w;
        }
    }

    skl
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unit_weight_is_identity() {
        let d = 3;
        let aders = DMatrix::from_fn(d + 1, d + 1, |k, l| {
            if k + l <= d {
                (k * 10 + l) as f64 - 4.5
            } else {
                0.0
            }
        });
        let mut wders = DMatrix::zeros(d + 1, d + 1);
        wders[(0, 0)] = 1.0;
        let skl = unweight(&aders, &wders, d, &BinomialTable::new());
        assert_eq!(skl, aders);
    }

    #[test]
    fn test_constant_weight_scales() {
        let aders = DMatrix::from_row_slice(2, 2, &[3.0, 1.5, -6.0, 0.0]);
        let mut wders = DMatrix::zeros(2, 2);
        wders[(0, 0)] = 1.5;
        let skl = unweight(&aders, &wders, 1, &BinomialTable::new());
        assert_abs_diff_eq!(skl[(0, 0)], 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(skl[(0, 1)], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(skl[(1, 0)], -4.0, epsilon = 1e-15);
    }

    #[test]
    fn test_quotient_rule_analytic() {
        // x(u, v) = A / W with A = u^2 v + u + 1 and W = 1 + u v at (u, v) = (0.5, 2).
        let (u, v) = (0.5_f64, 2.0_f64);
        let a = |k: usize, l: usize| -> f64 {
            match (k, l) {
                (0, 0) => u * u * v + u + 1.0,
                (1, 0) => 2.0 * u * v + 1.0,
                (0, 1) => u * u,
                (2, 0) => 2.0 * v,
                (1, 1) => 2.0 * u,
                (0, 2) => 0.0,
                _ => 0.0,
            }
        };
        let w = |k: usize, l: usize| -> f64 {
            match (k, l) {
                (0, 0) => 1.0 + u * v,
                (1, 0) => v,
                (0, 1) => u,
                (1, 1) => 1.0,
                _ => 0.0,
            }
        };
        let d = 2;
        let aders = DMatrix::from_fn(d + 1, d + 1, a);
        let wders = DMatrix::from_fn(d + 1, d + 1, w);
        let skl = unweight(&aders, &wders, d, &BinomialTable::new());

        let ww = w(0, 0);
        let x = a(0, 0) / ww;
        let x_u = (a(1, 0) - w(1, 0) * x) / ww;
        let x_v = (a(0, 1) - w(0, 1) * x) / ww;
        let x_uu = (a(2, 0) - 2.0 * w(1, 0) * x_u) / ww;
        let x_vv = (a(0, 2) - 2.0 * w(0, 1) * x_v) / ww;
        let x_uv = (a(1, 1) - w(1, 0) * x_v - w(0, 1) * x_u - w(1, 1) * x) / ww;

        assert_abs_diff_eq!(skl[(0, 0)], x, epsilon = 1e-12);
        assert_abs_diff_eq!(skl[(1, 0)], x_u, epsilon = 1e-12);
        assert_abs_diff_eq!(skl[(0, 1)], x_v, epsilon = 1e-12);
        assert_abs_diff_eq!(skl[(2, 0)], x_uu, epsilon = 1e-12);
        assert_abs_diff_eq!(skl[(0, 2)], x_vv, epsilon = 1e-12);
        assert_abs_diff_eq!(skl[(1, 1)], x_uv, epsilon = 1e-12);
    }
}
