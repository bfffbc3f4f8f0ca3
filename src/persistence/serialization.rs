//! Serialization utilities: bincode for index data, JSON for manifests.

use crate::error::{LcError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Magic bytes at the start of every index stream.
pub const INDEX_MAGIC: [u8; 4] = *b"LCIX";

/// Current index format version.
pub const INDEX_VERSION: u32 = 1;

/// Metadata written ahead of the index-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub magic: [u8; 4],
    pub version: u32,
    /// Size of the database the index was built over.
    pub num_objects: u64,
}

impl IndexHeader {
    pub fn new(num_objects: usize) -> Self {
        Self {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            num_objects: num_objects as u64,
        }
    }

    /// Check magic and version, and that the index matches a database of
    /// `num_objects` objects.
    pub fn validate(&self, num_objects: usize) -> Result<()> {
        if self.magic != INDEX_MAGIC {
            return Err(LcError::CorruptIndex("bad magic bytes".to_string()));
        }
        if self.version != INDEX_VERSION {
            return Err(LcError::CorruptIndex(format!(
                "unsupported format version {}",
                self.version
            )));
        }
        if self.num_objects != num_objects as u64 {
            return Err(LcError::CorruptIndex(format!(
                "index was built over {} objects, database has {}",
                self.num_objects, num_objects
            )));
        }
        Ok(())
    }
}

/// Encode data to bincode bytes.
pub fn to_bincode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| LcError::SerializationError(e.to_string()))
}

/// Decode data from bincode bytes.
pub fn from_bincode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| LcError::SerializationError(e.to_string()))
}

/// Write one bincode value to a stream.
pub fn write_bincode<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    bincode::serialize_into(writer, value).map_err(map_bincode_error)
}

/// Read one bincode value from a stream.
pub fn read_bincode<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    bincode::deserialize_from(reader).map_err(map_bincode_error)
}

/// Encode data to pretty JSON bytes.
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| LcError::SerializationError(e.to_string()))
}

/// Decode data from JSON bytes.
pub fn from_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| LcError::SerializationError(e.to_string()))
}

fn map_bincode_error(e: bincode::Error) -> LcError {
    match *e {
        bincode::ErrorKind::Io(io) => LcError::IoError(io),
        other => LcError::SerializationError(other.to_string()),
    }
}
