//! Insight client interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CallerInsight, PhoneNumber};

/// One network round trip: number in, structured insight record out.
///
/// The core depends on the backend only through this call. Implementations
/// enforce their own connect/read timeouts and surface a timeout as an
/// ordinary failure rather than hanging the caller.
#[async_trait]
pub trait InsightClient: Send + Sync {
    /// Analyze a phone number.
    async fn analyze(&self, number: &PhoneNumber) -> Result<CallerInsight>;
}
