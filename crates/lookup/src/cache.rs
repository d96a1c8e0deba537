//! Coalescing insight cache.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use caller_insight_core::{CallerInsight, InsightClient, PhoneNumber, Result};

/// Cached lookup result with its save time.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: CallerInsight,
    saved_at: Instant,
}

/// A lookup already in progress for a key. Cloned to every caller that
/// arrives while the network call is outstanding.
type InFlight = Shared<BoxFuture<'static, Result<CallerInsight>>>;

/// TTL-bounded insight cache with in-flight request coalescing.
///
/// Guarantees at most one concurrent network call per normalized number:
/// callers either get a fresh cached value with no I/O, join the outstanding
/// call for the same key, or start a new one. A failure is delivered
/// unmodified to every coalesced waiter and is never cached, so the next
/// lookup for that number re-attempts the network call. Retry policy belongs
/// to the caller.
pub struct InsightCache {
    client: Arc<dyn InsightClient>,
    entries: DashMap<PhoneNumber, CacheEntry>,
    in_flight: DashMap<PhoneNumber, InFlight>,
    ttl: Duration,
}

impl InsightCache {
    /// Create a cache over the given client.
    pub fn new(client: Arc<dyn InsightClient>, ttl: Duration) -> Self {
        Self {
            client,
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            ttl,
        }
    }

    /// Fresh cached value for a raw number, if one exists. No I/O.
    pub fn cached(&self, number_raw: &str) -> Option<CallerInsight> {
        self.cached_normalized(&PhoneNumber::normalize(number_raw))
    }

    fn cached_normalized(&self, number: &PhoneNumber) -> Option<CallerInsight> {
        let entry = self.entries.get(number)?;
        if entry.saved_at.elapsed() > self.ttl {
            // Expired entries are treated as absent; the map slot is
            // reclaimed by purge_expired or overwritten on refresh.
            return None;
        }
        Some(entry.value.clone())
    }

    /// Look up a number, suspending on network I/O at most once per key.
    pub async fn lookup(&self, number_raw: &str) -> Result<CallerInsight> {
        let number = PhoneNumber::normalize(number_raw);

        if let Some(hit) = self.cached_normalized(&number) {
            tracing::debug!(number = %number, "Insight cache hit");
            return Ok(hit);
        }

        let fut = match self.in_flight.entry(number.clone()) {
            MapEntry::Occupied(e) => {
                tracing::debug!(number = %number, "Joining in-flight lookup");
                e.get().clone()
            }
            MapEntry::Vacant(v) => {
                tracing::debug!(number = %number, "Insight cache miss, querying backend");
                let client = Arc::clone(&self.client);
                let key = number.clone();
                let fut: InFlight = async move { client.analyze(&key).await }.boxed().shared();
                v.insert(fut.clone());
                fut
            }
        };

        let result = fut.await;

        // Completion bookkeeping runs in every waiter. Both operations are
        // idempotent, so a caller dropped mid-await cannot strand the
        // in-flight entry or lose the cached value.
        self.in_flight.remove(&number);
        if let Ok(insight) = &result {
            self.entries.insert(
                number,
                CacheEntry {
                    value: insight.clone(),
                    saved_at: Instant::now(),
                },
            );
        }

        result
    }

    /// Drop every entry past its TTL.
    pub fn purge_expired(&self) {
        self.entries
            .retain(|_: &PhoneNumber, e: &mut CacheEntry| e.saved_at.elapsed() <= self.ttl);
    }

    /// Number of retained entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
