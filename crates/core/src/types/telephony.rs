//! Telephony call states.

use serde::{Deserialize, Serialize};

/// Coarse call state as reported by the telephony collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// An incoming call is ringing.
    Ringing,
    /// A call is active (answered).
    OffHook,
    /// No call activity.
    Idle,
}

impl CallState {
    /// Anything other than `Ringing` means the overlay has no reason to live.
    pub fn is_ringing(&self) -> bool {
        matches!(self, CallState::Ringing)
    }
}
