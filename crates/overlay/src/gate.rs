//! Foreground-app gating hysteresis.

/// Streak counter deciding when the dialer is genuinely on screen.
///
/// The foreground-app signal comes from sampling usage statistics on a fixed
/// timer, which is racy around the instant a call starts: the previous app
/// can still be reported on top. Requiring several consecutive matching
/// samples keeps the overlay from flashing over unrelated apps. This is a
/// best-effort display heuristic, not a security boundary.
#[derive(Debug)]
pub struct ForegroundGate {
    threshold: u32,
    dialers: Vec<String>,
    streak: u32,
}

impl ForegroundGate {
    pub fn new(threshold: u32, dialers: Vec<String>) -> Self {
        Self {
            threshold: threshold.max(1),
            dialers,
            streak: 0,
        }
    }

    /// Feed one polling sample. Returns whether the overlay may be shown.
    pub fn observe(&mut self, top_package: Option<&str>) -> bool {
        match top_package {
            Some(pkg) if self.dialers.iter().any(|d| d == pkg) => {
                self.streak = self.streak.saturating_add(1);
            }
            _ => self.streak = 0,
        }
        self.streak >= self.threshold
    }

    /// Reset the streak, e.g. when the sampling mechanism is unauthorized.
    pub fn reset(&mut self) {
        self.streak = 0;
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}
