//! Homogeneous NURBS surface record.

use nalgebra::DMatrix;
use nrb_core::traits::Validate;
use nrb_core::{KernelConfig, NrbError, Result, Tolerance};
use nrb_math::{to_homogeneous, DVec2, HPoint, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::SurfaceDerivativeEvaluator;
use crate::nurbs::DerivativeTensor;

/// A rational tensor-product surface in homogeneous form.
///
/// `coefs[i][j]` is `(x·w, y·w, z·w, w)` for the control point at u-index `i`
/// and v-index `j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsSurface {
    /// Control point counts in u and v
    pub number: [usize; 2],
    /// Degree + 1 in u and v
    pub order: [usize; 2],
    pub knots: [Vec<f64>; 2],
    pub coefs: Vec<Vec<HPoint>>,
}

impl NurbsSurface {
    pub fn new(order: [usize; 2], knots: [Vec<f64>; 2], coefs: Vec<Vec<HPoint>>) -> Result<Self> {
        let number = [coefs.len(), coefs.first().map_or(0, Vec::len)];
        let surface = Self {
            number,
            order,
            knots,
            coefs,
        };
        surface.check_shape()?;
        Ok(surface)
    }

    /// Build from Cartesian control points and their weights.
    pub fn from_weighted(
        degrees: [usize; 2],
        knots: [Vec<f64>; 2],
        points: &[Vec<Point3>],
        weights: &[Vec<f64>],
    ) -> Result<Self> {
        if points.len() != weights.len()
            || points.iter().zip(weights).any(|(p, w)| p.len() != w.len())
        {
            return Err(NrbError::DimensionMismatch(
                "weights grid does not match control point grid".into(),
            ));
        }
        let coefs = points
            .iter()
            .zip(weights)
            .map(|(row, w)| {
                row.iter()
                    .zip(w)
                    .map(|(&p, &w)| to_homogeneous(p, w))
                    .collect()
            })
            .collect();
        Self::new([degrees[0] + 1, degrees[1] + 1], knots, coefs)
    }

    pub fn degree_u(&self) -> usize {
        self.order[0].saturating_sub(1)
    }

    pub fn degree_v(&self) -> usize {
        self.order[1].saturating_sub(1)
    }

    pub fn domain_u(&self) -> (f64, f64) {
        let p = self.degree_u();
        let k = &self.knots[0];
        (k[p], k[k.len() - p - 1])
    }

    pub fn domain_v(&self) -> (f64, f64) {
        let q = self.degree_v();
        let k = &self.knots[1];
        (k[q], k[k.len() - q - 1])
    }

    /// Structural consistency of `number`, `order`, `knots` and `coefs`.
    pub fn check_shape(&self) -> Result<()> {
        if self.order.contains(&0) {
            return Err(NrbError::DimensionMismatch(format!(
                "order must be at least 1, got {:?}",
                self.order
            )));
        }
        if self.number.contains(&0) {
            return Err(NrbError::DimensionMismatch("empty control grid".into()));
        }
        if self.coefs.len() != self.number[0]
            || self.coefs.iter().any(|row| row.len() != self.number[1])
        {
            return Err(NrbError::DimensionMismatch(format!(
                "coefs grid does not match number {:?}",
                self.number
            )));
        }
        NrbError::check_counts(self.degree_u(), self.number[0], self.knots[0].len())?;
        NrbError::check_counts(self.degree_v(), self.number[1], self.knots[1].len())
    }

    /// One component of `coefs` as a `(number[0], number[1])` grid. Components
    /// 0..3 are the weighted coordinates, 3 is the weight.
    pub fn scalar_field(&self, component: usize) -> DMatrix<f64> {
        DMatrix::from_fn(self.number[0], self.number[1], |i, j| {
            self.coefs[i][j][component]
        })
    }

    /// Weight grid.
    pub fn weights(&self) -> DMatrix<f64> {
        self.scalar_field(3)
    }

    /// All partials up to total order `d` at one parameter pair.
    pub fn derivatives_at(&self, u: f64, v: f64, d: usize) -> Result<DerivativeTensor> {
        SurfaceDerivativeEvaluator::with_config(KernelConfig::sequential()).evaluate(
            self,
            &[DVec2::new(u, v)],
            d,
        )
    }

    pub fn point_at(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.derivatives_at(u, v, 0)?.point(0))
    }

    /// Point and first partials `(S, S_u, S_v)`.
    pub fn first_derivatives(&self, u: f64, v: f64) -> Result<(Point3, Vector3, Vector3)> {
        let skl = self.derivatives_at(u, v, 1)?;
        Ok((skl.point(0), skl.derivative(0, 1, 0), skl.derivative(0, 0, 1)))
    }

    pub fn validate_with(&self, tol: Tolerance) -> Result<()> {
        self.check_shape()?;
        for (dir, knots) in self.knots.iter().enumerate() {
            if let Some(i) = knots
                .windows(2)
                .position(|w| !tol.knots_ordered(w[0], w[1]))
            {
                return Err(NrbError::InvalidKnots(format!(
                    "knot vector {dir} decreases at index {}",
                    i + 1
                )));
            }
        }
        for (i, row) in self.coefs.iter().enumerate() {
            if let Some(j) = row.iter().position(|h| tol.is_zero_weight(h.w)) {
                return Err(NrbError::InvalidWeight(format!(
                    "control point ({i}, {j}) has zero weight"
                )));
            }
        }
        Ok(())
    }
}

impl Validate for NurbsSurface {
    fn validate(&self) -> Result<()> {
        self.validate_with(Tolerance::default())
    }
}
