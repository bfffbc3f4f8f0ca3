//! Binary save/load.
//!
//! Layout after the [`IndexHeader`]: the center count as `i32`, one `f32`
//! covering radius per cluster in cluster-id order, then the
//! [`PersistedSequence`]. The centers themselves are not written; they are
//! the positions of the sentinel symbol in the sequence.

use std::io::{Read, Write};
use std::sync::atomic::AtomicU64;

use super::ListOfClusters;
use crate::database::MetricDb;
use crate::error::{LcError, Result};
use crate::persistence::serialization::{read_bincode, write_bincode, IndexHeader};
use crate::sequence::PersistedSequence;

impl<'a, D: MetricDb> ListOfClusters<'a, D> {
    /// Write the index to `writer`.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_bincode(writer, &IndexHeader::new(self.db.len()))?;
        write_bincode(writer, &(self.num_centers() as i32))?;
        for r in &self.cov {
            write_bincode(writer, r)?;
        }
        write_bincode(writer, &self.seq.to_persisted())?;
        Ok(())
    }

    /// Read an index previously written by [`save`](Self::save), attaching
    /// it to `db`.
    pub fn load<R: Read>(reader: &mut R, db: &'a D) -> Result<Self> {
        let header: IndexHeader = read_bincode(reader)?;
        header.validate(db.len())?;

        let m: i32 = read_bincode(reader)?;
        if m <= 0 || m as usize > db.len() {
            return Err(LcError::CorruptIndex(format!(
                "invalid center count {} for {} objects",
                m,
                db.len()
            )));
        }
        let m = m as usize;

        let mut cov = Vec::with_capacity(m);
        for _ in 0..m {
            let r: f32 = read_bincode(reader)?;
            if !(r >= 0.0 && r.is_finite()) {
                return Err(LcError::CorruptIndex(format!("invalid covering radius {}", r)));
            }
            cov.push(r);
        }

        let persisted: PersistedSequence = read_bincode(reader)?;
        let seq = persisted.into_sequence()?;
        if seq.sigma() as usize != m + 1 {
            return Err(LcError::CorruptIndex(format!(
                "sequence alphabet {} does not match {} centers",
                seq.sigma(),
                m
            )));
        }
        if seq.len() != db.len() {
            return Err(LcError::CorruptIndex(format!(
                "sequence length {} does not match {} objects",
                seq.len(),
                db.len()
            )));
        }

        let sentinel = m as u32;
        let found = seq.count(sentinel);
        if found != m {
            return Err(LcError::CorruptIndex(format!(
                "expected {} centers in sequence, found {}",
                m, found
            )));
        }
        let centers: Vec<usize> = (0..m).map(|k| seq.select(sentinel, k)).collect();
        if centers.windows(2).any(|w| w[0] >= w[1]) || centers[m - 1] >= db.len() {
            return Err(LcError::CorruptIndex(
                "centers recovered from the sequence are not valid object ids".to_string(),
            ));
        }

        tracing::debug!(
            num_objects = db.len(),
            num_centers = m,
            sequence = %seq.kind(),
            "loaded list of clusters"
        );

        Ok(Self {
            db,
            centers,
            cov,
            seq,
            num_dists: AtomicU64::new(0),
        })
    }
}
