//! Trait seams between the core and its external collaborators.

mod history;
mod insight;
mod surface;
mod telephony;

pub use history::{HistoryEntry, HistorySink};
pub use insight::InsightClient;
pub use surface::{OverlaySurface, OverlayView};
pub use telephony::{CallStateSource, ForegroundSource};
