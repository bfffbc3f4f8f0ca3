//! Persistence layer: binary index format and on-disk index directories.

pub mod serialization;
pub mod snapshot;

pub use snapshot::IndexStore;
