//! In-memory history sink.

use std::sync::Mutex;

use async_trait::async_trait;

use caller_insight_core::{HistoryEntry, HistorySink, Result};

use crate::{current_timestamp_ms, push_front};

/// History kept only for the process lifetime; the fallback when no history
/// file is configured.
pub struct InMemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
    max_entries: usize,
}

impl InMemoryHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl HistorySink for InMemoryHistory {
    async fn save(&self, number: &str, summary: &str) -> Result<()> {
        let entry = HistoryEntry {
            number: number.to_string(),
            summary: summary.to_string(),
            timestamp_ms: current_timestamp_ms(),
        };
        let mut entries = self.entries.lock().unwrap();
        push_front(&mut entries, entry, self.max_entries);
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }
}
