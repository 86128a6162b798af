//! Batch evaluation of rational surface derivatives.

use std::sync::Arc;

use nalgebra::DMatrix;
use nrb_core::{KernelConfig, Result};
use nrb_math::{BinomialTable, DVec2};
use rayon::prelude::*;

use super::NurbsSurface;
use crate::nurbs::{unweight, DerivIndex, DerivativeTensor, TensorBasis, SPATIAL_DIM};

/// Evaluates `skl` tensors of [`NurbsSurface`]s.
///
/// Holds the binomial cache used by the unweighting step. Share one table
/// between evaluators by passing the same `Arc` to [`Self::with_binomials`].
#[derive(Debug, Clone)]
pub struct SurfaceDerivativeEvaluator {
    binomials: Arc<BinomialTable>,
    config: KernelConfig,
}

impl SurfaceDerivativeEvaluator {
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    pub fn with_config(config: KernelConfig) -> Self {
        Self::with_binomials(Arc::new(BinomialTable::new()), config)
    }

    pub fn with_binomials(binomials: Arc<BinomialTable>, config: KernelConfig) -> Self {
        binomials.prewarm(config.binomial_prewarm);
        Self { binomials, config }
    }

    pub fn binomials(&self) -> &Arc<BinomialTable> {
        &self.binomials
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Partials of `surface` up to total order `d` at every `(u, v)` in `uv`.
    ///
    /// The record is checked once for the whole batch. Samples must lie in
    /// the parametric domain; zero weights give non-finite entries.
    pub fn evaluate(
        &self,
        surface: &NurbsSurface,
        uv: &[DVec2],
        d: usize,
    ) -> Result<DerivativeTensor> {
        surface.check_shape()?;
        let basis = TensorBasis::new(
            surface.degree_u(),
            &surface.knots[0],
            surface.number[0],
            surface.degree_v(),
            &surface.knots[1],
            surface.number[1],
        )?;
        let fields: [DMatrix<f64>; 4] = std::array::from_fn(|c| surface.scalar_field(c));

        // Growth after this point would serialize the workers on the write guard.
        self.binomials.prewarm(d);

        let parallel = uv.len() >= self.config.parallel_threshold;
        log::debug!(
            "evaluating order {} derivatives of a {}x{} degree ({}, {}) surface at {} samples{}",
            d,
            surface.number[0],
            surface.number[1],
            surface.degree_u(),
            surface.degree_v(),
            uv.len(),
            if parallel { " in parallel" } else { "" }
        );

        let mut skl = DerivativeTensor::zeros(d, uv.len());
        let stride = skl.sample_stride();
        if parallel {
            skl.data_mut()
                .par_chunks_mut(stride)
                .zip(uv.par_iter())
                .for_each(|(out, &p)| self.fill_sample(&basis, &fields, p, d, out));
        } else {
            skl.data_mut()
                .chunks_mut(stride)
                .zip(uv)
                .for_each(|(out, &p)| self.fill_sample(&basis, &fields, p, d, out));
        }

        Ok(skl)
    }

    fn fill_sample(
        &self,
        basis: &TensorBasis<'_>,
        fields: &[DMatrix<f64>; 4],
        p: DVec2,
        d: usize,
        out: &mut [f64],
    ) {
        let at = basis.locate(p.x, p.y, d);
        let wders = basis.derivatives(&at, &fields[3]);
        for (dim, field) in fields.iter().enumerate().take(SPATIAL_DIM) {
            let aders = basis.derivatives(&at, field);
            let skl = unweight(&aders, &wders, d, &self.binomials);
            for du in 0..=d {
                for dv in 0..=(d - du) {
                    out[DerivIndex::new(dim, du, dv, 0).offset(d)] = skl[(du, dv)];
                }
            }
        }
    }
}

impl Default for SurfaceDerivativeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nrb_math::Point3;

    fn grid(n: usize) -> Vec<DVec2> {
        (0..n)
            .flat_map(|i| {
                (0..n).map(move |j| DVec2::new(i as f64 / (n - 1) as f64, j as f64 / (n - 1) as f64))
            })
            .collect()
    }

    fn wavy_surface() -> NurbsSurface {
        let knots = vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0];
        let points: Vec<Vec<Point3>> = (0..4)
            .map(|i| {
                (0..4)
                    .map(|j| Point3::new(i as f64, j as f64, ((i + 2 * j) % 3) as f64))
                    .collect()
            })
            .collect();
        let weights: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..4).map(|j| 1.0 + 0.25 * ((i * j) % 3) as f64).collect())
            .collect();
        NurbsSurface::from_weighted([2, 2], [knots.clone(), knots], &points, &weights).unwrap()
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let srf = wavy_surface();
        let uv = grid(11);
        let seq = SurfaceDerivativeEvaluator::with_config(KernelConfig::sequential())
            .evaluate(&srf, &uv, 2)
            .unwrap();
        let par = SurfaceDerivativeEvaluator::with_config(KernelConfig::new(4, 1))
            .evaluate(&srf, &uv, 2)
            .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_tensor_shape_and_zero_upper_triangle() {
        let srf = wavy_surface();
        let skl = SurfaceDerivativeEvaluator::new()
            .evaluate(&srf, &grid(3), 2)
            .unwrap();
        assert_eq!(skl.shape(), [3, 3, 3, 9]);
        for s in 0..9 {
            for dim in 0..3 {
                assert_eq!(skl.get(DerivIndex::new(dim, 2, 1, s)), 0.0);
                assert_eq!(skl.get(DerivIndex::new(dim, 1, 2, s)), 0.0);
                assert_eq!(skl.get(DerivIndex::new(dim, 2, 2, s)), 0.0);
            }
        }
    }

    #[test]
    fn test_first_derivatives_match_finite_differences() {
        let srf = wavy_surface();
        let eval = SurfaceDerivativeEvaluator::new();
        let h = 1e-6;
        for &(u, v) in &[(0.2, 0.3), (0.6, 0.55), (0.9, 0.1)] {
            let skl = eval.evaluate(&srf, &[DVec2::new(u, v)], 1).unwrap();
            let at = |u: f64, v: f64| srf.point_at(u, v).unwrap();
            let su = (at(u + h, v) - at(u - h, v)) / (2.0 * h);
            let sv = (at(u, v + h) - at(u, v - h)) / (2.0 * h);
            for c in 0..3 {
                assert_abs_diff_eq!(skl.derivative(0, 1, 0)[c], su[c], epsilon = 1e-3);
                assert_abs_diff_eq!(skl.derivative(0, 0, 1)[c], sv[c], epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        let skl = SurfaceDerivativeEvaluator::new()
            .evaluate(&wavy_surface(), &[], 1)
            .unwrap();
        assert_eq!(skl.samples(), 0);
        assert!(skl.as_slice().is_empty());
    }

    #[test]
    fn test_shared_binomial_table() {
        let table = Arc::new(BinomialTable::new());
        let a = SurfaceDerivativeEvaluator::with_binomials(table.clone(), KernelConfig::new(0, 64));
        let b = SurfaceDerivativeEvaluator::with_binomials(table.clone(), KernelConfig::new(0, 64));
        a.evaluate(&wavy_surface(), &[DVec2::new(0.5, 0.5)], 5).unwrap();
        assert_eq!(table.cached_len(), 6);
        assert!(Arc::ptr_eq(a.binomials(), b.binomials()));
    }
}
