#![deny(unused)]
//! Recent-lookup history sinks for CallerInsight.
//!
//! Both implementations keep the same capped, number-deduplicated,
//! newest-first list; [`JsonFileHistory`] additionally persists it as a JSON
//! array on disk.

pub mod file;
pub mod memory;

pub use file::JsonFileHistory;
pub use memory::InMemoryHistory;

use std::time::{SystemTime, UNIX_EPOCH};

use caller_insight_core::HistoryEntry;

fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Insert a new entry at the front, dropping any older entry for the same
/// number and everything past the cap.
fn push_front(list: &mut Vec<HistoryEntry>, entry: HistoryEntry, max_entries: usize) {
    list.retain(|e| e.number != entry.number);
    list.insert(0, entry);
    list.truncate(max_entries);
}
