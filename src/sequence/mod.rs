//! Compact integer sequences with rank/select, used to store cluster membership.
//!
//! A [`Sequence`] holds one symbol from `[0, sigma)` per position and
//! answers "which symbol is at position i" and "where is the k-th
//! occurrence of symbol c". The concrete representation is chosen with a
//! [`SequenceBuilder`], so an index can be re-encoded without touching its
//! search logic.

pub mod bitvec;
pub mod sorted_list;
pub mod wavelet;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use sorted_list::SortedListSeq;
pub use wavelet::WaveletMatrix;

/// Read-only symbol sequence over the alphabet `[0, sigma)`.
pub trait Sequence: fmt::Debug + Send + Sync {
    /// Number of positions.
    fn len(&self) -> usize;

    /// Alphabet size.
    fn sigma(&self) -> u32;

    /// Symbol stored at `pos`.
    fn access(&self, pos: usize) -> u32;

    /// Occurrences of `symbol` in positions `[0, pos)`.
    fn rank(&self, symbol: u32, pos: usize) -> usize;

    /// Position of the `k`-th occurrence (0-based) of `symbol`.
    ///
    /// Panics if `k >= self.count(symbol)`.
    fn select(&self, symbol: u32, k: usize) -> usize;

    /// Total occurrences of `symbol`.
    fn count(&self, symbol: u32) -> usize {
        self.rank(symbol, self.len())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The plain symbol array, used when re-encoding.
    fn raw_symbols(&self) -> Vec<u32> {
        (0..self.len()).map(|i| self.access(i)).collect()
    }

    /// Short name of the representation.
    fn kind(&self) -> SequenceKind;

    /// Owned, serializable copy of this sequence.
    fn to_persisted(&self) -> PersistedSequence;
}

/// Ascending positions holding one symbol of a [`Sequence`].
#[derive(Clone, Copy)]
pub struct Positions<'a> {
    seq: &'a dyn Sequence,
    symbol: u32,
    count: usize,
}

impl<'a> Positions<'a> {
    pub fn new(seq: &'a dyn Sequence, symbol: u32) -> Self {
        let count = seq.count(symbol);
        Self { seq, symbol, count }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The enumerated symbol.
    pub fn symbol(&self) -> u32 {
        self.symbol
    }

    /// The `k`-th position (0-based), ascending.
    pub fn get(&self, k: usize) -> Option<usize> {
        (k < self.count).then(|| self.seq.select(self.symbol, k))
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + 'a {
        let seq = self.seq;
        let symbol = self.symbol;
        (0..self.count).map(move |k| seq.select(symbol, k))
    }
}

impl fmt::Debug for Positions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Positions")
            .field("symbol", &self.symbol)
            .field("count", &self.count)
            .finish()
    }
}

/// Turns a raw symbol array into a queryable [`Sequence`].
pub trait SequenceBuilder {
    fn build(&self, symbols: Vec<u32>, sigma: u32) -> Box<dyn Sequence>;
}

impl<F> SequenceBuilder for F
where
    F: Fn(Vec<u32>, u32) -> Box<dyn Sequence>,
{
    fn build(&self, symbols: Vec<u32>, sigma: u32) -> Box<dyn Sequence> {
        self(symbols, sigma)
    }
}

/// The built-in sequence representations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    /// One sorted position list per symbol plus the plain symbol array.
    #[default]
    SortedList,
    /// Wavelet matrix over rank/select bitvectors.
    WaveletMatrix,
}

impl SequenceBuilder for SequenceKind {
    fn build(&self, symbols: Vec<u32>, sigma: u32) -> Box<dyn Sequence> {
        match self {
            SequenceKind::SortedList => Box::new(SortedListSeq::new(symbols, sigma)),
            SequenceKind::WaveletMatrix => Box::new(WaveletMatrix::new(&symbols, sigma)),
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceKind::SortedList => write!(f, "sorted-list"),
            SequenceKind::WaveletMatrix => write!(f, "wavelet-matrix"),
        }
    }
}

/// Serializable form of every built-in sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PersistedSequence {
    SortedList(SortedListSeq),
    WaveletMatrix(WaveletMatrix),
}

impl PersistedSequence {
    /// Validate the decoded structure and turn it into a queryable sequence.
    /// Inconsistent data is reported as [`CorruptIndex`](crate::LcError::CorruptIndex).
    pub fn into_sequence(self) -> Result<Box<dyn Sequence>> {
        match self {
            PersistedSequence::SortedList(s) => {
                s.validate()?;
                Ok(Box::new(s))
            }
            PersistedSequence::WaveletMatrix(s) => {
                s.validate()?;
                Ok(Box::new(s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_symbols() -> Vec<u32> {
        vec![2, 0, 1, 3, 0, 0, 2, 3, 1, 0]
    }

    fn check_against_plain(seq: &dyn Sequence, symbols: &[u32], sigma: u32) {
        assert_eq!(seq.len(), symbols.len());
        assert_eq!(seq.sigma(), sigma);
        assert_eq!(seq.raw_symbols(), symbols);
        for c in 0..sigma {
            let expected: Vec<usize> = symbols
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == c)
                .map(|(i, _)| i)
                .collect();
            let positions = Positions::new(seq, c);
            assert_eq!(positions.len(), expected.len());
            assert_eq!(positions.iter().collect::<Vec<_>>(), expected);
            for pos in 0..=symbols.len() {
                let r = symbols[..pos].iter().filter(|&&s| s == c).count();
                assert_eq!(seq.rank(c, pos), r, "rank({}, {})", c, pos);
            }
        }
    }

    #[test]
    fn test_builtin_kinds_agree() {
        let symbols = sample_symbols();
        for kind in [SequenceKind::SortedList, SequenceKind::WaveletMatrix] {
            let seq = kind.build(symbols.clone(), 4);
            assert_eq!(seq.kind(), kind);
            check_against_plain(seq.as_ref(), &symbols, 4);
        }
    }

    #[test]
    fn test_closure_builder() {
        let builder = |symbols: Vec<u32>, sigma: u32| -> Box<dyn Sequence> {
            Box::new(WaveletMatrix::new(&symbols, sigma))
        };
        let seq = builder.build(sample_symbols(), 4);
        assert_eq!(seq.kind(), SequenceKind::WaveletMatrix);
    }

    #[test]
    fn test_positions_get_out_of_range() {
        let seq = SequenceKind::SortedList.build(sample_symbols(), 4);
        let p = Positions::new(seq.as_ref(), 3);
        assert_eq!(p.get(0), Some(3));
        assert_eq!(p.get(1), Some(7));
        assert_eq!(p.get(2), None);
    }

    #[test]
    fn test_persisted_roundtrip() {
        for kind in [SequenceKind::SortedList, SequenceKind::WaveletMatrix] {
            let seq = kind.build(sample_symbols(), 4);
            let bytes = bincode::serialize(&seq.to_persisted()).unwrap();
            let back: PersistedSequence = bincode::deserialize(&bytes).unwrap();
            let back = back.into_sequence().unwrap();
            check_against_plain(back.as_ref(), &sample_symbols(), 4);
        }
    }
}
