//! Plain bitvector with rank and select support.

use serde::{Deserialize, Serialize};

use crate::error::{LcError, Result};

const WORD_BITS: usize = 64;

/// Immutable bitvector with a per-word cumulative popcount table.
///
/// `rank` is O(1); `select` binary-searches the popcount table and then
/// scans one word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankBitVec {
    words: Vec<u64>,
    len: usize,
    /// `ones_before[w]` = set bits in words `[0, w)`; one extra trailing entry.
    ones_before: Vec<usize>,
}

impl RankBitVec {
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut words = Vec::new();
        let mut len = 0;
        for bit in bits {
            if len % WORD_BITS == 0 {
                words.push(0u64);
            }
            if bit {
                words[len / WORD_BITS] |= 1u64 << (len % WORD_BITS);
            }
            len += 1;
        }

        let mut ones_before = Vec::with_capacity(words.len() + 1);
        let mut acc = 0;
        ones_before.push(0);
        for w in &words {
            acc += w.count_ones() as usize;
            ones_before.push(acc);
        }

        Self {
            words,
            len,
            ones_before,
        }
    }

    /// Check that a deserialized bitvector is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.words.len() != self.len.div_ceil(WORD_BITS) {
            return Err(LcError::CorruptIndex(format!(
                "bitvector of {} bits stored in {} words",
                self.len,
                self.words.len()
            )));
        }
        if let Some(&last) = self.words.last() {
            let used = self.len % WORD_BITS;
            if used != 0 && last >> used != 0 {
                return Err(LcError::CorruptIndex(
                    "bitvector has bits set past its length".to_string(),
                ));
            }
        }
        let mut acc = 0;
        let counts = std::iter::once(0).chain(self.words.iter().map(|w| {
            acc += w.count_ones() as usize;
            acc
        }));
        if !counts.eq(self.ones_before.iter().copied()) {
            return Err(LcError::CorruptIndex(
                "bitvector popcount table does not match its words".to_string(),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit index {} out of range {}", i, self.len);
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    pub fn count_ones(&self) -> usize {
        self.ones_before.last().copied().unwrap_or(0)
    }

    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Set bits in `[0, i)`.
    pub fn rank1(&self, i: usize) -> usize {
        assert!(i <= self.len, "rank position {} out of range {}", i, self.len);
        let w = i / WORD_BITS;
        let bit = i % WORD_BITS;
        let mut r = self.ones_before[w];
        if bit > 0 {
            r += (self.words[w] & ((1u64 << bit) - 1)).count_ones() as usize;
        }
        r
    }

    /// Clear bits in `[0, i)`.
    pub fn rank0(&self, i: usize) -> usize {
        i - self.rank1(i)
    }

    /// Position of the `k`-th set bit (0-based).
    pub fn select1(&self, k: usize) -> usize {
        assert!(k < self.count_ones(), "select1({}) with {} ones", k, self.count_ones());
        // last word whose preceding popcount is <= k
        let w = self.ones_before.partition_point(|&c| c <= k) - 1;
        let remaining = k - self.ones_before[w];
        w * WORD_BITS + nth_set_bit(self.words[w], remaining)
    }

    /// Position of the `k`-th clear bit (0-based).
    pub fn select0(&self, k: usize) -> usize {
        assert!(k < self.count_zeros(), "select0({}) with {} zeros", k, self.count_zeros());
        let zeros_before = |w: usize| w * WORD_BITS - self.ones_before[w];
        let (mut lo, mut hi) = (0, self.words.len());
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if zeros_before(mid) <= k {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let remaining = k - zeros_before(lo);
        lo * WORD_BITS + nth_set_bit(!self.words[lo], remaining)
    }
}

fn nth_set_bit(mut word: u64, n: usize) -> usize {
    for _ in 0..n {
        word &= word - 1;
    }
    word.trailing_zeros() as usize
}
