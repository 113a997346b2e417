//! Closed-itemset miner (§4.6, §4.9a).
//!
//! `CfiMiner` is the external-collaborator contract: given a sample-as-multiset
//! and an absolute support threshold, yield every CFI with its support. This
//! module ships one conforming implementation, [`FpClose`], built the way
//! `fp-growth`-style miners in the ecosystem are structured (recursive
//! conditional-pattern-base mining over a header table ordered by support),
//! followed by a closedness filter. Any other implementor of [`CfiMiner`]
//! satisfies §4.6's contract equally well — callers depend only on the trait.

use std::collections::{HashMap, HashSet};

use crate::itemset::{Item, Itemset};
use crate::sample::Sample;

/// An itemset paired with its support in the mined multiset.
pub type ItemsetWithSupport = (Itemset, u64);

/// The closed-itemset mining contract (§4.6).
///
/// Implementors receive the sample as a multiset of unique itemsets with
/// copy counts and an absolute support threshold `t >= 1`, and must return
/// every closed itemset whose support is `>= t`. The empty itemset is never
/// emitted. No ordering is guaranteed; returned itemsets are sorted ascending
/// internally (an [`Itemset`] is always stored sorted).
pub trait CfiMiner {
    /// Mine closed frequent itemsets from `sample` at absolute support `min_support`.
    fn mine(&self, sample: &Sample, min_support: u64) -> Vec<ItemsetWithSupport>;
}

/// An FP-growth-style closed-itemset miner.
///
/// Mining proceeds in two stages: first, every frequent itemset (not just
/// closed ones) is enumerated via recursive conditional-pattern-base growth
/// over a header table ordered by descending support; second, a closedness
/// filter drops any itemset that has a proper superset of equal support.
/// The filter is the simple `O(F^2)` pairwise check — acceptable since, as
/// SPEC_FULL.md notes, mining performance is explicitly out of scope here.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpClose;

impl CfiMiner for FpClose {
    fn mine(&self, sample: &Sample, min_support: u64) -> Vec<ItemsetWithSupport> {
        let transactions: Vec<(Vec<Item>, u64)> =
            sample.iter().map(|(its, c)| (its.items().to_vec(), c)).collect();
        let mut frequent = Vec::new();
        mine_frequent(&transactions, min_support, &[], &mut frequent);
        filter_closed(frequent)
    }
}

/// Recursive conditional-pattern-base growth, grounded on the standard
/// FP-growth recursion: process the header table from least to most
/// frequent, emit `item :: suffix` for each header item, then recurse into
/// the conditional transaction set restricted to items more frequent than
/// the current one.
fn mine_frequent(
    transactions: &[(Vec<Item>, u64)],
    min_support: u64,
    suffix: &[Item],
    out: &mut Vec<ItemsetWithSupport>,
) {
    let mut support: HashMap<Item, u64> = HashMap::new();
    for (items, c) in transactions {
        for &item in items {
            *support.entry(item).or_insert(0) += c;
        }
    }

    let mut header: Vec<Item> =
        support.iter().filter(|&(_, &s)| s >= min_support).map(|(&i, _)| i).collect();
    header.sort_by(|a, b| support[b].cmp(&support[a]).then(a.cmp(b)));

    for (pos, &item) in header.iter().enumerate().rev() {
        let item_support = support[&item];
        let mut pattern = suffix.to_vec();
        pattern.push(item);
        out.push((Itemset::new(pattern.clone()), item_support));

        let allowed: HashSet<Item> = header[..pos].iter().copied().collect();
        let cond_transactions: Vec<(Vec<Item>, u64)> = transactions
            .iter()
            .filter(|(items, _)| items.contains(&item))
            .filter_map(|(items, c)| {
                let prefix: Vec<Item> =
                    items.iter().copied().filter(|it| allowed.contains(it)).collect();
                if prefix.is_empty() {
                    None
                } else {
                    Some((prefix, *c))
                }
            })
            .collect();

        if !cond_transactions.is_empty() {
            mine_frequent(&cond_transactions, min_support, &pattern, out);
        }
    }
}

/// Drop every itemset that has a proper superset of equal support among
/// `all` (i.e. keep only the closed ones).
fn filter_closed(all: Vec<ItemsetWithSupport>) -> Vec<ItemsetWithSupport> {
    all.iter()
        .filter(|(a, sa)| {
            !all.iter().any(|(b, sb)| sb == sa && a.len() < b.len() && a.is_subset_of(b))
        })
        .cloned()
        .collect()
}

/// A brute-force miner used in tests as a cross-check oracle: enumerates all
/// `2^n - 1` nonempty subsets of the items appearing in the sample, which is
/// only tractable for the small synthetic datasets exercised in unit tests.
#[cfg(test)]
pub fn brute_force_mine(sample: &Sample, min_support: u64) -> Vec<ItemsetWithSupport> {
    let mut universe: Vec<Item> = sample.iter().flat_map(|(its, _)| its.items().to_vec()).collect();
    universe.sort_unstable();
    universe.dedup();

    let n = universe.len();
    let mut all = Vec::new();
    for mask in 1u64..(1u64 << n) {
        let candidate: Vec<Item> =
            (0..n).filter(|&b| mask & (1 << b) != 0).map(|b| universe[b]).collect();
        let candidate = Itemset::new(candidate);
        let support: u64 =
            sample.iter().filter(|(t, _)| candidate.is_subset_of(t)).map(|(_, c)| c).sum();
        if support >= min_support {
            all.push((candidate, support));
        }
    }
    filter_closed(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_from(pairs: &[(&[u32], u64)]) -> Sample {
        let mut s = Sample::new();
        for (items, c) in pairs {
            s.add(Itemset::new(items.to_vec()), *c);
        }
        s
    }

    #[test]
    fn scenario_c_mining_yields_one_two_pair() {
        // Transactions {1}, {2}, {1,2}, {1,2,3}; whole-dataset pass at supp1<=2
        let sample = sample_from(&[(&[1], 1), (&[2], 1), (&[1, 2], 1), (&[1, 2, 3], 1)]);
        let cfis = FpClose.mine(&sample, 2);
        let pair = Itemset::new(vec![1, 2]);
        assert!(cfis.iter().any(|(its, sp)| its == &pair && *sp == 2));
    }

    #[test]
    fn fp_close_matches_brute_force_on_random_small_inputs() {
        let sample = sample_from(&[
            (&[1, 2, 3], 3),
            (&[1, 2], 2),
            (&[2, 3, 4], 1),
            (&[1, 3], 4),
            (&[4], 1),
        ]);
        for min_support in [1, 2, 3, 4] {
            let mut fp: Vec<_> = FpClose.mine(&sample, min_support);
            let mut bf: Vec<_> = brute_force_mine(&sample, min_support);
            fp.sort_by(|a, b| a.0.items().cmp(b.0.items()));
            bf.sort_by(|a, b| a.0.items().cmp(b.0.items()));
            assert_eq!(fp, bf, "mismatch at min_support={min_support}");
        }
    }

    #[test]
    fn empty_itemset_never_emitted() {
        let sample = sample_from(&[(&[1], 5)]);
        let cfis = FpClose.mine(&sample, 1);
        assert!(cfis.iter().all(|(its, _)| !its.is_empty()));
    }

    #[test]
    fn min_support_threshold_is_respected() {
        let sample = sample_from(&[(&[1, 2], 1), (&[1], 4)]);
        let cfis = FpClose.mine(&sample, 5);
        assert!(cfis.iter().all(|(_, sp)| *sp >= 5));
    }
}
