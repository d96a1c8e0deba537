//! Stale-response guard.

use std::sync::atomic::{AtomicU64, Ordering};

use caller_insight_core::{Error, Result};

/// Token stamped at request time, checked at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardToken(u64);

/// Per-surface generation counter for discarding superseded async results.
///
/// Each presentation surface owns one guard. Before issuing a lookup it calls
/// [`begin`](Self::begin) and keeps the token; when the lookup completes it
/// calls [`is_current`](Self::is_current); a mismatch means a newer request
/// started in the meantime and this result must be dropped without touching
/// any displayed state. The check applies to cache hits too: even a fast hit
/// can resolve after a newer request has bumped the counter.
///
/// Tokens are monotonically increasing and never reused.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: AtomicU64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation and return its token.
    pub fn begin(&self) -> GuardToken {
        GuardToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the token still belongs to the latest request.
    pub fn is_current(&self, token: GuardToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// [`is_current`](Self::is_current) as a `Result`, for `?`-style use.
    pub fn check(&self, token: GuardToken) -> Result<()> {
        if self.is_current(token) {
            Ok(())
        } else {
            Err(Error::Superseded)
        }
    }
}
