//! Recent-lookup history interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One saved lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The number that was looked up.
    pub number: String,
    /// Summary text that was shown for it.
    pub summary: String,
    /// Save time, epoch milliseconds.
    pub timestamp_ms: i64,
}

/// Durable sink for recent lookups.
///
/// Implementations keep at most the 20 most recent entries, deduplicated by
/// number, newest first.
#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Record a lookup. An existing entry for the same number is replaced
    /// and the new entry moves to the front.
    async fn save(&self, number: &str, summary: &str) -> Result<()>;

    /// All saved entries, newest first.
    async fn recent(&self) -> Result<Vec<HistoryEntry>>;
}
