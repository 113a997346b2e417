//! CFI → FI expansion (§4.10), reproducing Algorithm 6.4 of Tan, Steinbach &
//! Kumar: walk Q by `<_L` from longest to shortest, and for each length class
//! derive the unseen subsets of the previous (longer) class's itemsets,
//! inheriting their support under the antimonotone property, before emitting
//! the remaining closed itemsets of that length.

use std::collections::{HashMap, HashSet};

use crate::itemset::{Itemset, ItemsetWithInfo};

/// Expand a (pruned) set of closed itemsets into all frequent itemsets it
/// implies, without re-mining the dataset.
pub fn expand_to_fis(q: &[ItemsetWithInfo]) -> Vec<(Itemset, u64)> {
    if q.is_empty() {
        return Vec::new();
    }

    let max_len = q.iter().map(|a| a.itemset.len()).max().unwrap_or(0);
    let mut by_len: HashMap<usize, Vec<(Itemset, u64)>> = HashMap::new();
    for a in q {
        by_len.entry(a.itemset.len()).or_default().push((a.itemset.clone(), a.info.sp));
    }

    let mut emitted: HashMap<Itemset, u64> = HashMap::new();
    // The previous (longer) length class's emitted itemsets, sorted by
    // descending support so the highest-support superset wins when two
    // supersets would otherwise generate the same subset.
    let mut previous: Vec<(Itemset, u64)> = Vec::new();

    for k in (1..=max_len).rev() {
        let mut at_k: Vec<(Itemset, u64)> = by_len.remove(&k).unwrap_or_default();
        at_k.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.items().cmp(b.0.items())));

        let mut seen_at_k: HashSet<Itemset> = HashSet::new();
        for (itemset, sp) in &at_k {
            if seen_at_k.insert(itemset.clone()) {
                emitted.insert(itemset.clone(), *sp);
            }
        }

        let mut derived: Vec<(Itemset, u64)> = Vec::new();
        for (superset, sp_super) in &previous {
            for subset in superset.drop_one_subsets() {
                if seen_at_k.insert(subset.clone()) {
                    emitted.insert(subset.clone(), *sp_super);
                    derived.push((subset, *sp_super));
                }
            }
        }

        let mut this_level = at_k;
        this_level.extend(derived);
        this_level.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.items().cmp(b.0.items())));
        previous = this_level;
    }

    let mut out: Vec<(Itemset, u64)> = emitted.into_iter().collect();
    out.sort_by(|a, b| a.0.items().cmp(b.0.items()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::{ItemsetInfo, Origin};

    fn with_info(items: &[u32], sp: u64) -> ItemsetWithInfo {
        ItemsetWithInfo {
            itemset: Itemset::new(items.to_vec()),
            info: ItemsetInfo::with_support(sp),
            origin: Origin::Mined,
        }
    }

    /// Q = {{1,2,3}@2, {1,2}@3} expands to all seven nonempty subsets,
    /// inheriting support from the smallest enclosing superset processed.
    #[test]
    fn scenario_f_expansion() {
        let q = vec![with_info(&[1, 2, 3], 2), with_info(&[1, 2], 3)];
        let fis = expand_to_fis(&q);
        let as_map: HashMap<Itemset, u64> = fis.into_iter().collect();

        assert_eq!(as_map[&Itemset::new(vec![1, 2, 3])], 2);
        assert_eq!(as_map[&Itemset::new(vec![1, 2])], 3);
        assert_eq!(as_map[&Itemset::new(vec![1, 3])], 2);
        assert_eq!(as_map[&Itemset::new(vec![2, 3])], 2);
        assert_eq!(as_map[&Itemset::new(vec![1])], 3);
        assert_eq!(as_map[&Itemset::new(vec![2])], 3);
        assert_eq!(as_map[&Itemset::new(vec![3])], 2);
        assert_eq!(as_map.len(), 7);
    }

    #[test]
    fn single_singleton_expands_to_itself() {
        let q = vec![with_info(&[1], 5)];
        let fis = expand_to_fis(&q);
        assert_eq!(fis, vec![(Itemset::new(vec![1]), 5)]);
    }

    #[test]
    fn empty_q_expands_to_empty() {
        assert!(expand_to_fis(&[]).is_empty());
    }
}
