//! Sample builder and per-item accounting (§4.3).
//!
//! Reads the dataset exactly once, selects the sampled transactions
//! (collapsing duplicates into copy counts), and populates the per-item
//! [`ItemsetInfo`] map the first bound (§4.5) reads.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::dataset::{is_metadata_line, parse_transaction_line};
use crate::error::AmiraError;
use crate::itemset::{Item, Itemset, ItemsetInfo};

/// A multiset of unique sampled transactions mapped to their copy count.
///
/// Invariant: the sum of all copy counts equals the requested sample size.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    counts: HashMap<Itemset, u64>,
}

impl Sample {
    /// An empty sample.
    pub fn new() -> Self {
        Sample { counts: HashMap::new() }
    }

    /// Add `copies` occurrences of `itemset` to the multiset.
    pub fn add(&mut self, itemset: Itemset, copies: u64) {
        *self.counts.entry(itemset).or_insert(0) += copies;
    }

    /// Iterate over `(itemset, copy_count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, u64)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Number of distinct transactions in the multiset.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all copy counts (the sample size `s`).
    pub fn total_count(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Output of the dataset scan: the sample multiset and per-item accounting.
pub struct SampleBuild {
    /// The sampled transactions, deduplicated with copy counts.
    pub sample: Sample,
    /// Per-item accounting (`sp`, and singleton `g`/`h`/`w` populated by the
    /// attribution step in §4.3 step 3).
    pub item_info: HashMap<Item, ItemsetInfo>,
}

/// Scan `path` once, selecting the transactions at `sorted_sample_indices`
/// (which must be sorted ascending, as produced by [`crate::sampler::sample_indices`]),
/// and build the sample multiset plus per-item accounting (§4.3).
pub fn build_sample(path: &Path, sorted_sample_indices: &[u64]) -> Result<SampleBuild, AmiraError> {
    let file = File::open(path).map_err(|e| AmiraError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut sample = Sample::new();
    let mut item_info: HashMap<Item, ItemsetInfo> = HashMap::new();

    let mut pending = sorted_sample_indices.iter().peekable();
    let mut txn_index: u64 = 0;

    for (lineno, line) in reader.lines().enumerate() {
        if pending.peek().is_none() {
            break;
        }
        let line = line.map_err(|e| AmiraError::io(path, e))?;
        if is_metadata_line(&line) {
            continue;
        }
        // Count how many pending sample indices point at this transaction.
        let mut copies: u64 = 0;
        while pending.peek() == Some(&&txn_index) {
            pending.next();
            copies += 1;
        }
        if copies > 0 {
            let itemset = parse_transaction_line(path, lineno + 1, &line)?;
            for &item in itemset.items() {
                item_info.entry(item).or_insert_with(|| ItemsetInfo::with_support(0)).sp += copies;
            }
            sample.add(itemset, copies);
        }
        txn_index += 1;
    }

    attribute_singletons(&sample, &mut item_info);

    Ok(SampleBuild { sample, item_info })
}

/// Write each unique sampled transaction to `path`, repeated `copies` times,
/// one transaction per line with items space-separated ascending — the
/// sample-output format of §6, also read back by `amira-compare`/`amira-sort`.
pub fn write_sample_file(sample: &Sample, path: &Path) -> Result<(), AmiraError> {
    let file = File::create(path).map_err(|e| AmiraError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for (itemset, copies) in sample.iter() {
        let line = itemset.to_plain_string();
        for _ in 0..copies {
            writeln!(writer, "{line}").map_err(|e| AmiraError::io(path, e))?;
        }
    }
    Ok(())
}

/// §4.3 step 3: for each unique sampled transaction, attribute it to the
/// item within it that comes first under `<_H` among singletons (minimum
/// support, ties broken by smaller item value), and update that item's
/// g/h/w via [`ItemsetInfo::update`].
fn attribute_singletons(sample: &Sample, item_info: &mut HashMap<Item, ItemsetInfo>) {
    for (itemset, copies) in sample.iter() {
        if itemset.is_empty() {
            continue;
        }
        let m = *itemset
            .items()
            .iter()
            .min_by_key(|&&item| (item_info[&item].sp, item))
            .expect("non-empty itemset has a minimal item");
        item_info.get_mut(&m).expect("item present in info map").update(itemset.len() - 1, copies);
    }
}
