//! Binomial coefficients through memoized log-factorials.
//!
//! Factorials overflow `f64` past `170!`, so coefficients are formed in log
//! space and rounded back to the nearest integer.

use std::sync::{PoisonError, RwLock};

const LANCZOS_COEFFICIENTS: [f64; 6] = [
    76.18009172947146,
    -86.50532032291677,
    24.01409824083091,
    -1.231739572450155,
    0.12086650973866179e-2,
    -0.5395239384953e-5,
];

/// `ln Γ(x)` for `x > 0`, six-term Lanczos approximation.
pub fn gammaln(x: f64) -> f64 {
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for c in LANCZOS_COEFFICIENTS {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

/// Growable `ln(n!)` cache with binomial lookups on top.
///
/// Lookups of an already cached `n` take the shared read guard; only growth
/// takes the write guard, so a table can be shared across threads. Entries
/// are pure functions of `n` and are never evicted.
#[derive(Debug)]
pub struct BinomialTable {
    ln_fact: RwLock<Vec<f64>>,
}

impl BinomialTable {
    pub fn new() -> Self {
        Self {
            ln_fact: RwLock::new(vec![0.0, 0.0]),
        }
    }

    /// Table with `ln(0!)..=ln(max_n!)` already filled.
    pub fn with_max_n(max_n: usize) -> Self {
        let table = Self::new();
        table.prewarm(max_n);
        table
    }

    /// Fill the cache up to `ln(n!)` so later lookups never need the write guard.
    pub fn prewarm(&self, n: usize) {
        if n < self.cached_len() {
            return;
        }
        let mut cache = self.ln_fact.write().unwrap_or_else(PoisonError::into_inner);
        Self::grow(&mut cache, n);
    }

    /// Number of cached log-factorials.
    pub fn cached_len(&self) -> usize {
        self.ln_fact
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `ln(n!)`.
    pub fn ln_fact(&self, n: usize) -> f64 {
        if n <= 1 {
            return 0.0;
        }
        {
            let cache = self.ln_fact.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(&v) = cache.get(n) {
                return v;
            }
        }
        let mut cache = self.ln_fact.write().unwrap_or_else(PoisonError::into_inner);
        Self::grow(&mut cache, n);
        cache[n]
    }

    /// `n` choose `k`, exact for the integer range the evaluators need.
    ///
    /// `k > n` is a caller error.
    pub fn binom(&self, n: usize, k: usize) -> f64 {
        debug_assert!(k <= n, "binom({n}, {k}) requires k <= n");
        let ln = self.ln_fact(n) - self.ln_fact(k) - self.ln_fact(n.saturating_sub(k));
        (0.5 + ln.exp()).floor()
    }

    fn grow(cache: &mut Vec<f64>, n: usize) {
        let from = cache.len();
        if n < from {
            return;
        }
        cache.extend((from..=n).map(|i| gammaln(i as f64 + 1.0)));
        log::trace!("ln(n!) cache grown from {} to {} entries", from, cache.len());
    }
}

impl Default for BinomialTable {
    fn default() -> Self {
        Self::new()
    }
}
