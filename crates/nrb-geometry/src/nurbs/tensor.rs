//! Rank-4 storage for surface derivative bundles.

use nrb_math::Vector3;
use serde::{Deserialize, Serialize};

/// Spatial dimensions stored per sample.
pub const SPATIAL_DIM: usize = 3;

/// Position of one scalar in a [`DerivativeTensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivIndex {
    /// Spatial component, `0..3`
    pub dim: usize,
    /// Derivative order in u
    pub du: usize,
    /// Derivative order in v
    pub dv: usize,
    pub sample: usize,
}

impl DerivIndex {
    pub fn new(dim: usize, du: usize, dv: usize, sample: usize) -> Self {
        Self { dim, du, dv, sample }
    }

    /// `((sample * 3 + dim) * (d + 1) + du) * (d + 1) + dv`
    pub fn offset(self, order: usize) -> usize {
        let side = order + 1;
        ((self.sample * SPATIAL_DIM + self.dim) * side + self.du) * side + self.dv
    }
}

/// `skl[dim][du][dv][sample]`, the mixed partials of a rational surface up to
/// total order `order` at a batch of samples.
///
/// Entries with `du + dv > order` are kept and are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeTensor {
    order: usize,
    samples: usize,
    data: Vec<f64>,
}

impl DerivativeTensor {
    pub fn zeros(order: usize, samples: usize) -> Self {
        let data = vec![0.0; Self::stride_for(order) * samples];
        Self {
            order,
            samples,
            data,
        }
    }

    fn stride_for(order: usize) -> usize {
        SPATIAL_DIM * (order + 1) * (order + 1)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// `(3, order + 1, order + 1, samples)`
    pub fn shape(&self) -> [usize; 4] {
        [SPATIAL_DIM, self.order + 1, self.order + 1, self.samples]
    }

    /// Scalars belonging to one sample.
    pub fn sample_stride(&self) -> usize {
        Self::stride_for(self.order)
    }

    pub fn get(&self, idx: DerivIndex) -> f64 {
        self.data[self.checked_offset(idx)]
    }

    pub fn set(&mut self, idx: DerivIndex, value: f64) {
        let offset = self.checked_offset(idx);
        self.data[offset] = value;
    }

    /// The `(du, dv)` partial at `sample` as a vector.
    pub fn derivative(&self, sample: usize, du: usize, dv: usize) -> Vector3 {
        Vector3::new(
            self.get(DerivIndex::new(0, du, dv, sample)),
            self.get(DerivIndex::new(1, du, dv, sample)),
            self.get(DerivIndex::new(2, du, dv, sample)),
        )
    }

    /// The surface point at `sample`.
    pub fn point(&self, sample: usize) -> Vector3 {
        self.derivative(sample, 0, 0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Per-sample chunks in sample order, each `sample_stride()` long and laid
    /// out as `(dim * (order + 1) + du) * (order + 1) + dv`.
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn checked_offset(&self, idx: DerivIndex) -> usize {
        assert!(
            idx.dim < SPATIAL_DIM
                && idx.du <= self.order
                && idx.dv <= self.order
                && idx.sample < self.samples,
            "{idx:?} out of bounds for tensor of shape {:?}",
            self.shape()
        );
        idx.offset(self.order)
    }
}
