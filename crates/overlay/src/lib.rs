#![deny(unused)]
//! Overlay presentation state machine for CallerInsight.
//!
//! [`OverlayController`] decides, from telephony and foreground-app signals,
//! when the floating information panel is created, updated, hidden, or torn
//! down. It drives lookups through the coalescing cache and applies the
//! stale-response guard before any displayed state changes.

pub mod controller;
pub mod gate;

pub use controller::{OverlayController, OverlayState};
pub use gate::ForegroundGate;
