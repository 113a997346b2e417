//! Derivative-free local minimisation of a unimodal objective on `x > 0`
//! (§4.5a).
//!
//! The bound objectives (§4.5, §4.8) are guaranteed by construction to have
//! a unique local — and therefore global — minimum on the positive reals, so
//! any correct local minimiser satisfies the contract described in
//! SPEC_FULL.md's "Numerical optimiser abstraction" design note. This module
//! provides one self-contained implementation (bracket-then-golden-section,
//! in the spirit of Brent's method) so the whole pipeline builds without an
//! FFI dependency on an external optimisation library, while keeping the same
//! external shape (`f`, a lower bound, an initial point, an absolute
//! tolerance) that a binding to a COBYLA-family optimiser would expose.

use crate::error::AmiraError;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Find an upper bracket `hi > x0` such that the objective's unique minimum
/// lies in `[lower_bound, hi]`, by doubling the step until the objective
/// increases again.
fn bracket_upper(
    f: &mut impl FnMut(f64) -> f64,
    lower_bound: f64,
    x0: f64,
    context: &'static str,
) -> Result<f64, AmiraError> {
    let mut lo = x0.max(lower_bound + 1e-12);
    let mut f_lo = f(lo);
    if !f_lo.is_finite() {
        return Err(AmiraError::Optimiser {
            context,
            reason: format!("objective is non-finite at initial point x={lo}"),
        });
    }
    let mut hi = lo * 2.0;
    let mut iterations = 0usize;
    loop {
        let f_hi = f(hi);
        if !f_hi.is_finite() {
            return Err(AmiraError::Optimiser {
                context,
                reason: format!("objective is non-finite while bracketing at x={hi}"),
            });
        }
        if f_hi > f_lo {
            return Ok(hi);
        }
        lo = hi;
        f_lo = f_hi;
        hi *= 2.0;
        iterations += 1;
        if iterations > 200 || !hi.is_finite() {
            return Err(AmiraError::Optimiser {
                context,
                reason: "failed to bracket a minimum after doubling 200 times".to_string(),
            });
        }
    }
}

/// Golden-section search over `[lo, hi]`, refined with a bisection-style
/// value check, stopping once consecutive midpoint objective values differ
/// by less than `abs_tol` or the iteration budget is exhausted.
fn golden_section(
    f: &mut impl FnMut(f64) -> f64,
    mut lo: f64,
    mut hi: f64,
    abs_tol: f64,
    max_iterations: usize,
    context: &'static str,
) -> Result<(f64, f64), AmiraError> {
    let resphi = 2.0 - GOLDEN_RATIO;
    let mut c = lo + resphi * (hi - lo);
    let mut d = hi - resphi * (hi - lo);
    let mut fc = f(c);
    let mut fd = f(d);
    if !fc.is_finite() || !fd.is_finite() {
        return Err(AmiraError::Optimiser {
            context,
            reason: "objective is non-finite during golden-section search".to_string(),
        });
    }

    let mut prev_best = fc.min(fd);
    for _ in 0..max_iterations {
        if fc < fd {
            hi = d;
            d = c;
            fd = fc;
            c = lo + resphi * (hi - lo);
            fc = f(c);
            if !fc.is_finite() {
                return Err(AmiraError::Optimiser {
                    context,
                    reason: "objective is non-finite during golden-section search".to_string(),
                });
            }
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = hi - resphi * (hi - lo);
            fd = f(d);
            if !fd.is_finite() {
                return Err(AmiraError::Optimiser {
                    context,
                    reason: "objective is non-finite during golden-section search".to_string(),
                });
            }
        }
        let best = fc.min(fd);
        if (best - prev_best).abs() < abs_tol {
            let (x_best, f_best) = if fc < fd { (c, fc) } else { (d, fd) };
            return Ok((x_best, f_best));
        }
        prev_best = best;
    }
    let (x_best, f_best) = if fc < fd { (c, fc) } else { (d, fd) };
    Ok((x_best, f_best))
}

/// Minimise `f` over `x > lower_bound`, starting the bracketing search near
/// `x0`, stopping when consecutive objective values differ by less than
/// `abs_tol`. Returns `(x*, f(x*))`.
///
/// `context` names the caller's objective (e.g. `"omega1"`) and is threaded
/// into any [`AmiraError::Optimiser`] raised.
pub fn minimize(
    mut f: impl FnMut(f64) -> f64,
    lower_bound: f64,
    x0: f64,
    abs_tol: f64,
    context: &'static str,
) -> Result<(f64, f64), AmiraError> {
    let hi = bracket_upper(&mut f, lower_bound, x0, context)?;
    golden_section(&mut f, lower_bound, hi, abs_tol, 200, context)
}
