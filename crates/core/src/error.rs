//! Error types for CallerInsight.

use thiserror::Error;

/// Result type alias using CallerInsight's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for CallerInsight.
///
/// The enum is `Clone` so that a single lookup failure can be delivered to
/// every caller coalesced onto the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Backend error {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // =========================================================================
    // Overlay Errors
    // =========================================================================
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A newer request superseded this one. Absorbed by the stale-response
    /// guard; never user-visible.
    #[error("Superseded by a newer request")]
    Superseded,

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("History error: {0}")]
    History(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a network failure error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a backend error from a non-2xx response.
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::Backend {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a permission denied error.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a history error.
    pub fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is terminal for the requesting surface, as opposed
    /// to a silently-discarded superseded result.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Superseded)
    }
}
