//! Insight records returned by the backend.

use serde::{Deserialize, Serialize};

/// Risk/identity information for one phone number.
///
/// Immutable once constructed; produced only by an [`crate::traits::InsightClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInsight {
    /// Risk classification, e.g. "low", "scam_likely". "unknown" when the
    /// backend had nothing.
    pub risk_level: String,
    /// Human-readable summary of what is known about the number.
    pub summary: String,
    /// Optional confidence annotation for the risk level.
    pub confidence: Option<String>,
    /// Optional link to the top web search result for the number.
    pub web_link: Option<String>,
    /// Title of the web search result, when a link is present.
    pub web_title: Option<String>,
}

impl CallerInsight {
    /// A minimal record carrying only risk and summary.
    pub fn new(risk_level: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            risk_level: risk_level.into(),
            summary: summary.into(),
            confidence: None,
            web_link: None,
            web_title: None,
        }
    }

    /// Attach a confidence annotation.
    pub fn with_confidence(mut self, confidence: impl Into<String>) -> Self {
        self.confidence = Some(confidence.into());
        self
    }
}
