//! JSON-file history sink.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use caller_insight_core::{Error, HistoryEntry, HistorySink, Result};

use crate::{current_timestamp_ms, push_front};

/// History persisted as a JSON array of entries.
///
/// The whole list is read, rewritten, and replaced on every save; at 20
/// entries this is cheaper than being clever. A missing or corrupt file
/// reads as an empty list, so one bad write can never brick the history.
pub struct JsonFileHistory {
    path: PathBuf,
    max_entries: usize,
    // Serializes read-modify-write cycles against the file.
    io_lock: Mutex<()>,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
            io_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<HistoryEntry> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable history file, starting empty");
                Vec::new()
            }
        }
    }

    fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).map_err(|e| Error::history(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| Error::history(e.to_string()))
    }
}

#[async_trait]
impl HistorySink for JsonFileHistory {
    async fn save(&self, number: &str, summary: &str) -> Result<()> {
        let entry = HistoryEntry {
            number: number.to_string(),
            summary: summary.to_string(),
            timestamp_ms: current_timestamp_ms(),
        };

        let _guard = self.io_lock.lock().unwrap();
        let mut entries = self.load();
        push_front(&mut entries, entry, self.max_entries);

        tracing::trace!(
            path = %self.path.display(),
            count = entries.len(),
            "Writing lookup history"
        );
        self.store(&entries)
    }

    async fn recent(&self) -> Result<Vec<HistoryEntry>> {
        let _guard = self.io_lock.lock().unwrap();
        Ok(self.load())
    }
}
