use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{HistoryEntry, HistoryEntryError};

/// Errors surfaced by ledger adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a history entry.
///
/// This mirrors the domain `HistoryEntry` so ledger backends can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub recorded_at: DateTime<Utc>,
    pub user: String,
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub incorrect_details: String,
}

impl HistoryRecord {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at(),
            user: entry.user().to_owned(),
            correct: entry.correct(),
            incorrect: entry.incorrect(),
            total: entry.total(),
            incorrect_details: entry.incorrect_details().to_owned(),
        }
    }

    /// Convert the record back into a domain `HistoryEntry`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError` if the stored counters do not add up or
    /// the user name is blank.
    pub fn into_entry(self) -> Result<HistoryEntry, HistoryEntryError> {
        HistoryEntry::from_persisted(
            self.recorded_at,
            self.user,
            self.correct,
            self.incorrect,
            self.total,
            self.incorrect_details,
        )
    }
}

/// Repository contract for the quiz results ledger.
///
/// The ledger is append-only: entries are written once per finished session
/// and read back in insertion order.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one entry to the ledger.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), PersistenceError>;

    /// Load all entries in insertion order.
    ///
    /// An absent store is not an error; implementations return an empty list.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if an existing store cannot be read.
    async fn load_entries(&self) -> Result<Vec<HistoryEntry>, PersistenceError>;
}

/// Simple in-memory ledger for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryHistory {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistory {
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), PersistenceError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        guard.push(entry.clone());
        Ok(())
    }

    async fn load_entries(&self) -> Result<Vec<HistoryEntry>, PersistenceError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates ledger access behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(InMemoryHistory::new()),
        }
    }

    /// Ledger backed by a flat CSV file at the given path.
    #[must_use]
    pub fn csv_file(path: impl AsRef<Path>) -> Self {
        Self {
            history: Arc::new(crate::csv::CsvHistoryLedger::new(path.as_ref())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn build_entry(user: &str, correct: u32, incorrect: u32) -> HistoryEntry {
        HistoryEntry::new(user, fixed_now(), correct, incorrect, "").unwrap()
    }

    #[tokio::test]
    async fn in_memory_preserves_insertion_order() {
        let repo = InMemoryHistory::new();
        repo.append_entry(&build_entry("ada", 3, 0)).await.unwrap();
        repo.append_entry(&build_entry("grace", 1, 2)).await.unwrap();

        let entries = repo.load_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user(), "ada");
        assert_eq!(entries[1].user(), "grace");
    }

    #[tokio::test]
    async fn empty_store_loads_as_empty_list() {
        let repo = InMemoryHistory::new();
        assert!(repo.load_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_aggregate_wires_in_memory_ledger() {
        let storage = Storage::in_memory();
        storage
            .history
            .append_entry(&build_entry("ada", 1, 1))
            .await
            .unwrap();
        assert_eq!(storage.history.load_entries().await.unwrap().len(), 1);
    }

    #[test]
    fn record_round_trips_through_entry() {
        let entry = build_entry("ada", 2, 1);
        let record = HistoryRecord::from_entry(&entry);
        let restored = record.into_entry().unwrap();
        assert_eq!(restored, entry);
    }

    #[test]
    fn record_with_bad_total_fails_rehydration() {
        let mut record = HistoryRecord::from_entry(&build_entry("ada", 2, 1));
        record.total = 9;
        assert!(record.into_entry().is_err());
    }
}
