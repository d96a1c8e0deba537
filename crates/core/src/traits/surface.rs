//! Presentation surface interface.

use crate::error::Result;

/// What the presentation surface should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    /// Display form of the subject number.
    pub number: String,
    /// Status or summary line.
    pub text: String,
    /// Whether the panel should actually be drawn. A window can exist while
    /// deliberately hidden (foreground gating).
    pub visible: bool,
}

/// The floating panel collaborator. Rendering itself is out of scope; the
/// state machine only tells the surface what to do.
pub trait OverlaySurface: Send + Sync {
    /// Create the underlying window. Fails with
    /// [`crate::Error::PermissionDenied`] when the display permission is
    /// missing; the caller must then fail closed.
    fn attach(&self) -> Result<()>;

    /// Update what is shown. Only called between a successful `attach` and
    /// the matching `detach`.
    fn render(&self, view: &OverlayView);

    /// Tear the window down. Best-effort and idempotent.
    fn detach(&self);
}
