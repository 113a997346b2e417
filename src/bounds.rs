//! The bound engine (§4.5, §4.8): the two log-sum-exp objectives, the
//! derivative-free minimisation that turns them into ω, and the closed-form
//! ω → ρ transformation shared by both bounds.

use std::collections::HashMap;

use crate::error::AmiraError;
use crate::itemset::{Item, ItemsetInfo, ItemsetWithInfo};
use crate::mathutil::{ln_choose, ln_cosh, LogSumAccumulator, LN_2};
use crate::optimizer;

/// ω (ERA upper bound) and ρ (maximum-deviation upper bound) for one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EraEps {
    /// Upper bound on the empirical Rademacher average.
    pub omega: f64,
    /// Probabilistic upper bound on the maximum deviation, derived from `omega`.
    pub rho: f64,
}

/// `S(x)` from §4.5, evaluated in log space via [`LogSumAccumulator`]: each
/// summand in the paper's objective is folded in as one log-term, so the
/// accumulator's value is `ln(sum of exp(term_i))`.
fn items_objective_sum(x: f64, item_info: &HashMap<Item, ItemsetInfo>) -> f64 {
    let lncoshx = ln_cosh(x);
    let mut acc = LogSumAccumulator::zero();
    for info in item_info.values() {
        acc.add_log(info.sp as f64 * lncoshx);
        for (&k, &gk) in &info.g {
            if gk == 0 {
                continue;
            }
            let hk = info.h_at(k);
            let start_j = hk - gk + 1;
            for j in start_j..=hk {
                let two_exp = (k as u64).min(j) as f64;
                acc.add_log(two_exp * LN_2 + (1 + j) as f64 * lncoshx);
            }
        }
    }
    acc.value()
}

/// Minimise `S(x)/x` over `x > 0` (§4.5) and return `(omega, rho)`.
pub fn compute_eraeps_items(
    item_info: &HashMap<Item, ItemsetInfo>,
    s: u64,
    delta: f64,
) -> Result<EraEps, AmiraError> {
    let (_, min_value) =
        optimizer::minimize(|x| items_objective_sum(x, item_info) / x, 0.0, 2.0, 1e-7, "omega1")?;
    Ok(eraeps_from_min(min_value, s, delta))
}

/// The `c(k, j)` term from §4.8: a tightened upper bound on the log of a
/// partial binomial sum, using log-gamma based binomial coefficients to
/// avoid overflow for large `j`.
fn c_term(k: usize, j: u64, t_minus_1: u64) -> f64 {
    let loose = (k as u64).min(j) as f64 * LN_2;
    if j % 2 == 0 {
        let t_minus_2 = t_minus_1 as i64 - 1;
        if t_minus_2 <= (j / 2) as i64 {
            let tight =
                ln_choose(j, t_minus_2) - ln_choose(j, (j / 2) as i64) + (j as f64 - 1.0) * LN_2;
            return loose.min(tight);
        }
    }
    loose
}

/// `S2(x)` from §4.8, the CFI-variant objective, evaluated the same way as
/// [`items_objective_sum`].
fn itemset_objective_sum(x: f64, t_minus_1: u64, q: &[ItemsetWithInfo]) -> f64 {
    let lncoshx = ln_cosh(x);
    let mut acc = LogSumAccumulator::zero();
    for a in q {
        acc.add_log(a.info.sp as f64 * lncoshx);
        for (&k, &gk) in &a.info.g {
            if gk == 0 {
                continue;
            }
            let hk = a.info.h_at(k);
            let wk = a.info.w_at(k);
            let start_j = hk - gk + 1;
            for j in start_j..=hk {
                let w_minus = wk as i64 - (hk as i64 - j as i64);
                let capped = (t_minus_1 as i64).min(w_minus) as f64;
                acc.add_log(c_term(k, j, t_minus_1) + capped * lncoshx);
            }
        }
    }
    acc.value()
}

/// Minimise `S2(x)/x` over `x > 0` (§4.8) and return `(omega, rho)`.
pub fn compute_eraeps_itemsets(
    q: &[ItemsetWithInfo],
    t_minus_1: u64,
    s: u64,
    delta: f64,
) -> Result<EraEps, AmiraError> {
    let (_, min_value) = optimizer::minimize(
        |x| itemset_objective_sum(x, t_minus_1, q) / x,
        0.0,
        2.0,
        1e-7,
        "omega2",
    )?;
    Ok(eraeps_from_min(min_value, s, delta))
}

/// Turn the minimised objective value into `(omega, rho)` via the
/// self-bounding inequality and the absolute-deviation inequality (§4.5).
fn eraeps_from_min(min_value: f64, s: u64, delta: f64) -> EraEps {
    let omega = min_value / s as f64;
    let rho = rho_from_omega(omega, delta, s);
    EraEps { omega, rho }
}

/// ρ from ω via the two-step closed-form transformation of §4.5 (also used,
/// unmodified, to derive ρ₂ from ω₂ in §4.8).
pub fn rho_from_omega(omega: f64, delta: f64, s: u64) -> f64 {
    let b = 1.0_f64;
    let eta = delta / 2.0;
    let s = s as f64;
    let ln_inv_eta = (1.0 / eta).ln();
    let ra = omega + (b * ln_inv_eta + (b * ln_inv_eta * (b * ln_inv_eta + 4.0 * s * omega)).sqrt()) / (2.0 * s);
    2.0 * ra + b * (((2.0f64).ln() - eta.ln()) / (2.0 * s)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::Itemset;

    fn single_item_info(sp: u64) -> HashMap<Item, ItemsetInfo> {
        let mut m = HashMap::new();
        m.insert(1, ItemsetInfo::with_support(sp));
        m
    }

    #[test]
    fn items_objective_is_finite_and_positive_for_simple_input() {
        let info = single_item_info(1);
        let v = items_objective_sum(2.0, &info);
        assert!(v.is_finite());
    }

    #[test]
    fn compute_eraeps_items_is_finite_positive() {
        let info = single_item_info(1);
        let eraeps = compute_eraeps_items(&info, 1, 0.1).unwrap();
        assert!(eraeps.omega.is_finite() && eraeps.omega > 0.0);
        assert!(eraeps.rho.is_finite() && eraeps.rho > 0.0);
    }

    #[test]
    fn rho_is_deterministic_across_runs() {
        let info = single_item_info(5);
        let a = compute_eraeps_items(&info, 10, 0.1).unwrap();
        let b = compute_eraeps_items(&info, 10, 0.1).unwrap();
        assert!((a.omega - b.omega).abs() < 1e-7);
        assert!((a.rho - b.rho).abs() < 1e-7);
    }

    #[test]
    fn rho_decreases_as_sample_size_grows() {
        let mut info = single_item_info(50);
        info.get_mut(&1).unwrap().update(1, 50);
        let small = rho_from_omega(0.1, 0.1, 50);
        let large = rho_from_omega(0.1, 0.1, 5000);
        assert!(large < small);
    }

    #[test]
    fn compute_eraeps_itemsets_is_finite_for_empty_q() {
        let eraeps = compute_eraeps_itemsets(&[], 0, 1, 0.1).unwrap();
        assert!(eraeps.omega.is_finite());
        assert!(eraeps.rho.is_finite());
    }

    #[test]
    fn compute_eraeps_itemsets_with_one_element() {
        let mut info = ItemsetInfo::with_support(3);
        info.update(2, 1);
        let q = vec![ItemsetWithInfo {
            itemset: Itemset::new(vec![1]),
            info,
            origin: crate::itemset::Origin::Mined,
        }];
        let eraeps = compute_eraeps_itemsets(&q, 2, 3, 0.1).unwrap();
        assert!(eraeps.omega.is_finite() && eraeps.omega > 0.0);
    }
}
