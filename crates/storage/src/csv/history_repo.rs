use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quiz_core::model::HistoryEntry;

use crate::repository::{HistoryRecord, HistoryRepository, PersistenceError};

fn io(e: std::io::Error) -> PersistenceError {
    PersistenceError::Io(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> PersistenceError {
    PersistenceError::Serialization(e.to_string())
}

/// Append-only quiz history ledger backed by a flat CSV file.
///
/// The header row is written on first append; later appends add one row per
/// finished session. A missing file reads back as an empty history.
#[derive(Debug, Clone)]
pub struct CsvHistoryLedger {
    path: PathBuf,
}

impl CsvHistoryLedger {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> Result<bool, PersistenceError> {
        if !self.path.exists() {
            return Ok(true);
        }
        let metadata = fs::metadata(&self.path).map_err(io)?;
        Ok(metadata.len() == 0)
    }
}

#[async_trait]
impl HistoryRepository for CsvHistoryLedger {
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io)?;
        }

        let write_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(HistoryRecord::from_entry(entry)).map_err(ser)?;
        writer.flush().map_err(io)?;

        tracing::debug!(path = %self.path.display(), user = entry.user(), "appended history entry");
        Ok(())
    }

    async fn load_entries(&self) -> Result<Vec<HistoryEntry>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(ser)?;
        let mut entries = Vec::new();
        for record in reader.deserialize::<HistoryRecord>() {
            let record = record.map_err(ser)?;
            entries.push(record.into_entry().map_err(ser)?);
        }
        Ok(entries)
    }
}
