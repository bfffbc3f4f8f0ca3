//! Index directories: save/load a built index to/from disk.

use crate::database::MetricDb;
use crate::error::Result;
use crate::lc::{IndexSummary, ListOfClusters};
use crate::persistence::serialization;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Manages one index directory: `index.bin` plus a `manifest.json` summary.
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Create a store for the given directory, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join("index.bin")
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join("manifest.json")
    }

    /// Save an index and its manifest.
    pub fn save<D: MetricDb>(&self, index: &ListOfClusters<'_, D>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(self.index_path())?);
        index.save(&mut writer)?;
        writer.flush()?;

        // Human-readable summary next to the binary index
        let manifest = serialization::to_json(&index.summary())?;
        fs::write(self.manifest_path(), &manifest)?;

        tracing::info!(dir = %self.dir.display(), "index saved");
        Ok(())
    }

    /// Load the index, attaching it to `db`, or return None if none was saved.
    pub fn load<'a, D: MetricDb>(&self, db: &'a D) -> Result<Option<ListOfClusters<'a, D>>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = BufReader::new(File::open(&path)?);
        let index = ListOfClusters::load(&mut reader, db)?;
        tracing::info!(
            dir = %self.dir.display(),
            num_centers = index.num_centers(),
            "index loaded"
        );
        Ok(Some(index))
    }

    /// Read the manifest without loading the index.
    pub fn manifest(&self) -> Result<Option<IndexSummary>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serialization::from_json(&bytes)?))
    }

    /// Check if an index exists.
    pub fn exists(&self) -> bool {
        self.index_path().exists()
    }
}
