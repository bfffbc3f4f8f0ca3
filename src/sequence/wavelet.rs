//! Wavelet matrix sequence.
//!
//! Each level stores one bit of every symbol (most significant first) in a
//! [`RankBitVec`], after stably moving the previous level's zeros in front of
//! its ones. Access, rank and select all cost one bitvector operation per
//! level, i.e. `O(log sigma)`.

use serde::{Deserialize, Serialize};

use super::bitvec::RankBitVec;
use super::{PersistedSequence, Sequence, SequenceKind};
use crate::error::{LcError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveletMatrix {
    levels: Vec<RankBitVec>,
    /// Number of zeros at each level.
    zeros: Vec<usize>,
    len: usize,
    sigma: u32,
}

impl WaveletMatrix {
    pub fn new(symbols: &[u32], sigma: u32) -> Self {
        debug_assert!(symbols.iter().all(|&s| s < sigma));
        let height = bits_for(sigma);
        let mut levels = Vec::with_capacity(height);
        let mut zeros = Vec::with_capacity(height);
        let mut current = symbols.to_vec();

        for level in 0..height {
            let shift = height - 1 - level;
            let bv = RankBitVec::from_bits(current.iter().map(|&s| (s >> shift) & 1 == 1));
            let (mut lo, hi): (Vec<u32>, Vec<u32>) =
                current.iter().partition(|&&s| (s >> shift) & 1 == 0);
            zeros.push(lo.len());
            levels.push(bv);
            lo.extend(hi);
            current = lo;
        }

        Self {
            levels,
            zeros,
            len: symbols.len(),
            sigma,
        }
    }

    /// Check that a deserialized matrix is internally consistent and only
    /// holds symbols below `sigma`.
    pub fn validate(&self) -> Result<()> {
        let height = bits_for(self.sigma);
        if self.levels.len() != height || self.zeros.len() != height {
            return Err(LcError::CorruptIndex(format!(
                "wavelet matrix has {} levels and {} zero counts, expected {}",
                self.levels.len(),
                self.zeros.len(),
                height
            )));
        }
        for (level, (bv, &zeros)) in self.levels.iter().zip(&self.zeros).enumerate() {
            bv.validate()?;
            if bv.len() != self.len || bv.count_zeros() != zeros {
                return Err(LcError::CorruptIndex(format!(
                    "wavelet level {} disagrees with the matrix shape",
                    level
                )));
            }
        }
        if let Some(pos) = (0..self.len).find(|&i| self.access(i) >= self.sigma) {
            return Err(LcError::CorruptIndex(format!(
                "symbol at position {} is outside the alphabet of {}",
                pos, self.sigma
            )));
        }
        Ok(())
    }

    fn bit(&self, symbol: u32, level: usize) -> bool {
        let shift = self.levels.len() - 1 - level;
        (symbol >> shift) & 1 == 1
    }

    /// Range `[start, end)` of `symbol`'s occurrences among the first `pos`
    /// positions, mapped to the bottom level.
    fn descend(&self, symbol: u32, pos: usize) -> (usize, usize) {
        let (mut start, mut end) = (0, pos);
        for (level, bv) in self.levels.iter().enumerate() {
            if self.bit(symbol, level) {
                start = self.zeros[level] + bv.rank1(start);
                end = self.zeros[level] + bv.rank1(end);
            } else {
                start = bv.rank0(start);
                end = bv.rank0(end);
            }
        }
        (start, end)
    }
}

fn bits_for(sigma: u32) -> usize {
    let max_symbol = sigma.saturating_sub(1);
    (u32::BITS - max_symbol.leading_zeros()).max(1) as usize
}

impl Sequence for WaveletMatrix {
    fn len(&self) -> usize {
        self.len
    }

    fn sigma(&self) -> u32 {
        self.sigma
    }

    fn access(&self, pos: usize) -> u32 {
        let mut i = pos;
        let mut symbol = 0u32;
        for (level, bv) in self.levels.iter().enumerate() {
            let b = bv.get(i);
            symbol = (symbol << 1) | b as u32;
            i = if b {
                self.zeros[level] + bv.rank1(i)
            } else {
                bv.rank0(i)
            };
        }
        symbol
    }

    fn rank(&self, symbol: u32, pos: usize) -> usize {
        if symbol >= self.sigma {
            return 0;
        }
        let (start, end) = self.descend(symbol, pos);
        end - start
    }

    fn select(&self, symbol: u32, k: usize) -> usize {
        let (start, _) = self.descend(symbol, 0);
        let mut pos = start + k;
        for (level, bv) in self.levels.iter().enumerate().rev() {
            pos = if self.bit(symbol, level) {
                bv.select1(pos - self.zeros[level])
            } else {
                bv.select0(pos)
            };
        }
        pos
    }

    fn kind(&self) -> SequenceKind {
        SequenceKind::WaveletMatrix
    }

    fn to_persisted(&self) -> PersistedSequence {
        PersistedSequence::WaveletMatrix(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(4), 2);
        assert_eq!(bits_for(5), 3);
        assert_eq!(bits_for(257), 9);
    }

    #[test]
    fn test_access_rank_select() {
        let symbols: Vec<u32> = (0..500).map(|i| (i * 37 % 11) as u32).collect();
        let wm = WaveletMatrix::new(&symbols, 11);

        for (i, &s) in symbols.iter().enumerate() {
            assert_eq!(wm.access(i), s);
        }
        for c in 0..11 {
            let positions: Vec<usize> = (0..symbols.len()).filter(|&i| symbols[i] == c).collect();
            assert_eq!(wm.count(c), positions.len());
            for (k, &p) in positions.iter().enumerate() {
                assert_eq!(wm.select(c, k), p);
                assert_eq!(wm.rank(c, p), k);
            }
        }
    }

    #[test]
    fn test_absent_symbol() {
        let wm = WaveletMatrix::new(&[0, 2, 2, 0], 4);
        assert_eq!(wm.count(1), 0);
        assert_eq!(wm.count(3), 0);
        assert_eq!(wm.count(9), 0);
    }

    #[test]
    fn test_validate() {
        let wm = WaveletMatrix::new(&[0, 2, 1, 2, 0], 3);
        assert!(wm.validate().is_ok());

        let mut empty_level = WaveletMatrix::new(&[1, 0, 1], 2);
        empty_level.levels[0] = RankBitVec::from_bits(std::iter::empty());
        assert!(empty_level.validate().is_err());

        let mut bad_zeros = wm.clone();
        bad_zeros.zeros[1] += 1;
        assert!(bad_zeros.validate().is_err());

        // symbol 3 encoded in a matrix declaring sigma = 3
        let mut out_of_alphabet = WaveletMatrix::new(&[0, 3, 1], 4);
        out_of_alphabet.sigma = 3;
        assert!(out_of_alphabet.validate().is_err());
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let wm = WaveletMatrix::new(&[0, 0, 0], 1);
        assert_eq!(wm.count(0), 3);
        assert_eq!(wm.select(0, 2), 2);
        assert_eq!(wm.access(1), 0);
    }
}
