//! Telephony and foreground-app signal sources.

use tokio::sync::watch;

use crate::error::Result;
use crate::types::CallState;

/// Source of telephony call-state signals.
pub trait CallStateSource: Send + Sync {
    /// Sample the current call state.
    fn current(&self) -> CallState;

    /// Subscribe to call-state transitions.
    fn subscribe(&self) -> watch::Receiver<CallState>;
}

/// Source of the on-screen foreground application.
///
/// Best-effort: the underlying query samples usage statistics on a timer and
/// can lag or misreport around app switches. Treat it as a display heuristic,
/// never as a security boundary.
pub trait ForegroundSource: Send + Sync {
    /// Package name of the current foreground app, or `None` when it cannot
    /// be determined. Returns [`crate::Error::PermissionDenied`] when the
    /// querying mechanism itself is unauthorized.
    fn top_package(&self) -> Result<Option<String>>;
}
