//! Random subsets and permutations.
//!
//! Every function takes the random source from the caller, so a single
//! seeded `StdRng` can drive a whole index construction reproducibly.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{LcError, Result};

/// Identity permutation `0..n`.
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Draw `count` distinct values uniformly from `[0, n)`.
///
/// Values are returned in the order they were accepted, not sorted.
/// This is rejection sampling against a set of drawn values: use it only
/// for `count` much smaller than `n`, since it slows down sharply as
/// `count` approaches `n`.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    n: usize,
) -> Result<Vec<usize>> {
    if count > n {
        return Err(LcError::InvalidParameter(format!(
            "cannot sample {} distinct values from a domain of size {}",
            count, n
        )));
    }

    let mut drawn = HashSet::with_capacity(count);
    let mut sample = Vec::with_capacity(count);
    while sample.len() < count {
        let p = rng.gen_range(0..n);
        if drawn.insert(p) {
            sample.push(p);
        }
    }
    Ok(sample)
}

/// Pick `count` distinct items of `items` uniformly at random.
pub fn sample_from<R: Rng + ?Sized, T: Clone>(
    rng: &mut R,
    count: usize,
    items: &[T],
) -> Result<Vec<T>> {
    let picks = sample_without_replacement(rng, count, items.len())?;
    Ok(picks.into_iter().map(|i| items[i].clone()).collect())
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<R: Rng + ?Sized, T>(rng: &mut R, items: &mut [T]) {
    let n = items.len();
    for i in 0..n {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}

/// A uniformly random permutation of `0..n`.
pub fn random_permutation<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<usize> {
    let mut p = identity(n);
    shuffle(rng, &mut p);
    p
}

/// Inverse permutation: `inv[p[i]] == i` for every `i`.
///
/// Fails if `p` is not a permutation of `0..p.len()`.
pub fn invert_permutation(p: &[usize]) -> Result<Vec<usize>> {
    let n = p.len();
    let mut inv = vec![usize::MAX; n];
    for (i, &v) in p.iter().enumerate() {
        if v >= n || inv[v] != usize::MAX {
            return Err(LcError::InvalidParameter(format!(
                "not a permutation: value {} at position {}",
                v, i
            )));
        }
        inv[v] = i;
    }
    Ok(inv)
}
