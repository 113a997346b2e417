//! Numerically stable log-space arithmetic shared by the bound objectives.
//!
//! All sums of exponentials in the bound engine (§4.5, §4.8) are carried out
//! in log space via [`LogSumAccumulator`], whose `combine` is the associative,
//! commutative (up to floating-point error) `logsumexp` reduction described
//! in SPEC_FULL.md §5. This keeps the reduction swappable for a parallel fold
//! later without touching the objective code.

use std::f64::consts::PI;

/// `ln(exp(a) + exp(b))`, computed without overflowing either exponential.
///
/// `logsumexp(-inf, x) == x` and `logsumexp(-inf, -inf) == -inf`.
pub fn logsumexp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let m = a.max(b);
    m + (a.min(b) - m).exp().ln_1p()
}

/// A running log-space sum, accumulated via repeated [`logsumexp`] folds.
///
/// `combine` is associative and commutative up to floating-point rounding,
/// so it is safe to use as a parallel-fold reduction operator (§5) even
/// though this crate only ever uses it sequentially.
#[derive(Clone, Copy, Debug)]
pub struct LogSumAccumulator(f64);

impl LogSumAccumulator {
    /// The log-space additive identity (`ln(0) = -inf`).
    pub fn zero() -> Self {
        LogSumAccumulator(f64::NEG_INFINITY)
    }

    /// Fold in a new log-space term.
    pub fn add_log(&mut self, log_term: f64) {
        self.0 = logsumexp(self.0, log_term);
    }

    /// Combine two partial accumulators (the reduction operator).
    pub fn combine(self, other: Self) -> Self {
        LogSumAccumulator(logsumexp(self.0, other.0))
    }

    /// The accumulated log-space value.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// `ln(2)`.
pub const LN_2: f64 = std::f64::consts::LN_2;

/// `ln(cosh(x))`, computed in the numerically stable form
/// `|x| + ln1p(exp(-2|x|)) - ln(2)` (§5).
pub fn ln_cosh(x: f64) -> f64 {
    let ax = x.abs();
    ax + (-2.0 * ax).exp().ln_1p() - LN_2
}

/// Log-gamma via the Lanczos approximation (g=7, n=9 coefficients).
#[allow(clippy::excessive_precision)]
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula.
        let lnpi_sin = (PI * x).sin().abs().ln();
        PI.ln() - lnpi_sin - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut ag = COEFFS[0];
        for (i, &c) in COEFFS[1..].iter().enumerate() {
            let denom = x + (i as f64) + 1.0;
            ag += c / denom;
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + ag.ln()
    }
}

/// `ln(n choose k)` for integer `n, k >= 0`, `k <= n`, via log-gamma.
///
/// Returns `-inf` for out-of-range `k` (an empty partial sum), matching the
/// convention used by the `c(k, j)` term in §4.8.
pub fn ln_choose(n: u64, k: i64) -> f64 {
    if k < 0 || k as u64 > n {
        return f64::NEG_INFINITY;
    }
    let (n, k) = (n as f64, k as f64);
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}
