use serde::{Deserialize, Serialize};

/// Evaluator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Largest `n` whose `ln(n!)` is filled eagerly when an evaluator is built.
    pub binomial_prewarm: usize,
    /// Minimum number of samples before a batch is split across the rayon pool.
    pub parallel_threshold: usize,
}

impl KernelConfig {
    pub const DEFAULT_BINOMIAL_PREWARM: usize = 16;
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

    pub fn new(binomial_prewarm: usize, parallel_threshold: usize) -> Self {
        Self {
            binomial_prewarm,
            parallel_threshold,
        }
    }

    /// Never split batches; useful when the caller already parallelizes.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            binomial_prewarm: Self::DEFAULT_BINOMIAL_PREWARM,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
