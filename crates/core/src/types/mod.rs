//! Shared value types.

mod insight;
mod phone;
mod telephony;

pub use insight::CallerInsight;
pub use phone::PhoneNumber;
pub use telephony::CallState;
