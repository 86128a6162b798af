/// Tolerances used when checking spline records before evaluation.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Slack allowed when checking that consecutive knots are non-decreasing
    pub knot: f64,
    /// Weights with a smaller magnitude are treated as zero
    pub weight: f64,
}

impl Tolerance {
    pub const DEFAULT_KNOT: f64 = 1e-12;
    pub const DEFAULT_WEIGHT: f64 = 1e-12;

    pub fn new(knot: f64, weight: f64) -> Self {
        Self { knot, weight }
    }

    pub fn default_precision() -> Self {
        Self {
            knot: Self::DEFAULT_KNOT,
            weight: Self::DEFAULT_WEIGHT,
        }
    }

    pub fn loose() -> Self {
        Self {
            knot: 1e-8,
            weight: 1e-8,
        }
    }

    pub fn tight() -> Self {
        Self {
            knot: 0.0,
            weight: f64::MIN_POSITIVE,
        }
    }

    /// `b` does not precede `a` by more than the knot tolerance.
    pub fn knots_ordered(self, a: f64, b: f64) -> bool {
        b - a >= -self.knot
    }

    /// Check if a weight is zero within tolerance
    pub fn is_zero_weight(self, w: f64) -> bool {
        w.abs() < self.weight
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
