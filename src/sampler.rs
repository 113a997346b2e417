//! Uniform-with-replacement sampler over transaction indices (§4.2).

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Draw `s` indices uniformly and independently with replacement from
/// `0..n`, returned in ascending order.
///
/// When `s == n` this returns the identity sequence `0..n` without consuming
/// any randomness, matching the degenerate whole-dataset-pass optimisation
/// allowed by §4.2.
pub fn sample_indices(n: u64, s: u64, rng: &mut StdRng) -> Vec<u64> {
    if s == n {
        return (0..n).collect();
    }
    let dist = Uniform::from(0..n);
    let mut idx: Vec<u64> = (0..s).map(|_| dist.sample(rng)).collect();
    idx.sort_unstable();
    idx
}

/// Build a `StdRng` from an explicit seed.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Build a `StdRng` seeded from the OS entropy source, for use when the
/// caller has not supplied a reproducible seed.
pub fn rng_from_entropy() -> StdRng {
    StdRng::from_entropy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_dataset_pass_is_identity() {
        let mut rng = rng_from_seed(1);
        let idx = sample_indices(5, 5, &mut rng);
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn sample_indices_are_sorted_and_in_range() {
        let mut rng = rng_from_seed(42);
        let idx = sample_indices(10, 25, &mut rng);
        assert_eq!(idx.len(), 25);
        assert!(idx.iter().all(|&i| i < 10));
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let idx1 = sample_indices(100, 30, &mut rng_from_seed(7));
        let idx2 = sample_indices(100, 30, &mut rng_from_seed(7));
        assert_eq!(idx1, idx2);
    }
}
