//! Transaction dataset I/O (§4.1).
//!
//! The dataset is a flat UTF-8 text file: lines starting with `#` are
//! metadata, everything else is a transaction (whitespace-separated
//! nonnegative integers).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::AmiraError;
use crate::itemset::Itemset;

const SIZE_METADATA_PREFIX: &str = "# size:";

/// A transaction read from the dataset: its itemset and the 0-indexed
/// position of its line among non-metadata lines.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// The transaction's items, sorted ascending.
    pub itemset: Itemset,
    /// Index of this transaction among non-metadata lines (0-indexed).
    pub index: u64,
}

/// Determine the number of transactions (non-metadata lines) in `path`.
///
/// If a line's first non-blank byte is `#`, the line is metadata and is
/// skipped; when such a line starts with the literal prefix `# size: ` the
/// remainder is parsed as the transaction count and returned immediately
/// without scanning the rest of the file.
pub fn dataset_size(path: &Path) -> Result<u64, AmiraError> {
    let file = File::open(path).map_err(|e| AmiraError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut count: u64 = 0;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AmiraError::io(path, e))?;
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            if let Some(rest) = trimmed.strip_prefix(SIZE_METADATA_PREFIX) {
                let n: u64 = rest.trim().parse().map_err(|_| AmiraError::Parse {
                    path: path.to_path_buf(),
                    line: lineno + 1,
                    reason: format!("malformed `{SIZE_METADATA_PREFIX}` metadata: `{rest}`"),
                })?;
                return Ok(n);
            }
            continue;
        }
        count += 1;
    }
    Ok(count)
}

/// Parse a single transaction line into a sorted [`Itemset`].
///
/// An empty (or whitespace-only) line is a legal, empty transaction.
pub fn parse_transaction_line(
    path: &Path,
    lineno: usize,
    line: &str,
) -> Result<Itemset, AmiraError> {
    let mut items = Vec::new();
    for tok in line.split_whitespace() {
        let item: u32 = tok.parse().map_err(|_| AmiraError::Parse {
            path: path.to_path_buf(),
            line: lineno,
            reason: format!("non-integer item token `{tok}`"),
        })?;
        items.push(item);
    }
    Ok(Itemset::new(items))
}

/// Whether `line` is a metadata line (first non-blank byte is `#`).
pub fn is_metadata_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
