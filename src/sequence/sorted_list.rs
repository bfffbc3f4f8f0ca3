//! Sequence backed by one sorted position list per symbol.

use serde::{Deserialize, Serialize};

use super::{PersistedSequence, Sequence, SequenceKind};
use crate::error::{LcError, Result};

/// Inverted-list sequence: `select` is a direct lookup, `rank` a binary search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortedListSeq {
    symbols: Vec<u32>,
    lists: Vec<Vec<u32>>,
}

impl SortedListSeq {
    /// Build from a symbol array. Positions must fit in `u32`.
    pub fn new(symbols: Vec<u32>, sigma: u32) -> Self {
        debug_assert!(symbols.len() <= u32::MAX as usize);
        let mut lists = vec![Vec::new(); sigma as usize];
        for (pos, &s) in symbols.iter().enumerate() {
            lists[s as usize].push(pos as u32);
        }
        Self { symbols, lists }
    }

    /// Check that the position lists are exactly the positions of each
    /// symbol in the symbol array.
    pub fn validate(&self) -> Result<()> {
        let mut total = 0;
        for (c, list) in self.lists.iter().enumerate() {
            let mut prev: Option<u32> = None;
            for &p in list {
                if prev.is_some_and(|q| q >= p) {
                    return Err(LcError::CorruptIndex(format!(
                        "positions of symbol {} are not strictly ascending",
                        c
                    )));
                }
                if self.symbols.get(p as usize) != Some(&(c as u32)) {
                    return Err(LcError::CorruptIndex(format!(
                        "position {} listed for symbol {} does not hold it",
                        p, c
                    )));
                }
                prev = Some(p);
            }
            total += list.len();
        }
        // every listed position holds its symbol, so equal totals mean no
        // symbol is missing from its list or outside the alphabet
        if total != self.symbols.len() {
            return Err(LcError::CorruptIndex(format!(
                "position lists cover {} of {} symbols",
                total,
                self.symbols.len()
            )));
        }
        Ok(())
    }

    /// All positions holding `symbol`, ascending.
    pub fn positions(&self, symbol: u32) -> &[u32] {
        self.lists
            .get(symbol as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Sequence for SortedListSeq {
    fn len(&self) -> usize {
        self.symbols.len()
    }

    fn sigma(&self) -> u32 {
        self.lists.len() as u32
    }

    fn access(&self, pos: usize) -> u32 {
        self.symbols[pos]
    }

    fn rank(&self, symbol: u32, pos: usize) -> usize {
        self.positions(symbol)
            .partition_point(|&p| (p as usize) < pos)
    }

    fn select(&self, symbol: u32, k: usize) -> usize {
        self.positions(symbol)[k] as usize
    }

    fn count(&self, symbol: u32) -> usize {
        self.positions(symbol).len()
    }

    fn raw_symbols(&self) -> Vec<u32> {
        self.symbols.clone()
    }

    fn kind(&self) -> SequenceKind {
        SequenceKind::SortedList
    }

    fn to_persisted(&self) -> PersistedSequence {
        PersistedSequence::SortedList(self.clone())
    }
}
