//! Overlay state machine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use caller_insight_core::config::OverlayConfig;
use caller_insight_core::{
    CallState, CallStateSource, CallerInsight, ForegroundSource, HistorySink, OverlaySurface,
    OverlayView, PhoneNumber, Result,
};
use caller_insight_lookup::{InsightCache, RequestGuard};

use crate::gate::ForegroundGate;

const SEARCHING_TEXT: &str = "Searching…";
const LOOKUP_FAILED_TEXT: &str = "Lookup failed";

/// Presentation state of the overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No window exists.
    Absent,
    /// Window created and shown with the current number/summary.
    Visible,
    /// Window created but deliberately not drawn, because the dialer is not
    /// confirmed to be the on-screen foreground app.
    HiddenPendingForeground,
}

struct Inner {
    state: OverlayState,
    number: Option<PhoneNumber>,
    text: String,
    last_update: Instant,
}

#[derive(Default)]
struct Tasks {
    auto_dismiss: Option<JoinHandle<()>>,
    call_listener: Option<JoinHandle<()>>,
    poller: Option<JoinHandle<()>>,
}

/// Owner of the single overlay window and its telephony subscription.
///
/// All transitions are synchronous critical sections under one lock; only
/// lookups and history writes suspend, and never while the lock is held.
/// Every teardown path cancels the timers and releases the call-state
/// subscription, and teardown is idempotent across signal sources (call
/// ended, auto-dismiss, manual close, poll loop).
///
/// The controller is a cheap handle; clones share the same window and state.
#[derive(Clone)]
pub struct OverlayController {
    shared: Arc<ControllerShared>,
}

struct ControllerShared {
    config: OverlayConfig,
    surface: Arc<dyn OverlaySurface>,
    cache: Arc<InsightCache>,
    history: Arc<dyn HistorySink>,
    calls: Arc<dyn CallStateSource>,
    foreground: Option<Arc<dyn ForegroundSource>>,
    guard: RequestGuard,
    inner: Mutex<Inner>,
    tasks: Mutex<Tasks>,
}

impl OverlayController {
    pub fn new(
        config: OverlayConfig,
        surface: Arc<dyn OverlaySurface>,
        cache: Arc<InsightCache>,
        history: Arc<dyn HistorySink>,
        calls: Arc<dyn CallStateSource>,
    ) -> Self {
        Self {
            shared: Arc::new(ControllerShared {
                config,
                surface,
                cache,
                history,
                calls,
                foreground: None,
                guard: RequestGuard::new(),
                inner: Mutex::new(Inner {
                    state: OverlayState::Absent,
                    number: None,
                    text: String::new(),
                    last_update: Instant::now(),
                }),
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    /// Attach the foreground-app source used by the gating variant. Without
    /// one, a gating configuration behaves as permanently unauthorized and
    /// the overlay stays hidden. Only meaningful before the first signal.
    pub fn with_foreground_source(mut self, source: Arc<dyn ForegroundSource>) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.foreground = Some(source),
            None => tracing::warn!("Foreground source ignored: controller already shared"),
        }
        self
    }

    /// Incoming-call signal from the call-screening collaborator.
    ///
    /// Creates the window on first use, or updates the subject of the
    /// existing one in place; either way the lookup restarts under a fresh
    /// guard token. Fails closed: if the window cannot be attached the state
    /// stays `Absent` and the error is returned.
    pub fn on_incoming_call(&self, number_raw: &str) -> Result<()> {
        let shared = &self.shared;
        let number = PhoneNumber::normalize(number_raw);

        {
            let mut inner = shared.inner.lock().unwrap();
            if inner.state == OverlayState::Absent {
                if let Err(e) = shared.surface.attach() {
                    tracing::warn!(error = %e, "Overlay window could not be attached");
                    return Err(e);
                }
                inner.state = if shared.config.foreground_gating {
                    OverlayState::HiddenPendingForeground
                } else {
                    OverlayState::Visible
                };
                tracing::debug!(number = %number, state = ?inner.state, "Overlay created");
            } else {
                tracing::debug!(number = %number, "Overlay subject updated in place");
            }
            inner.number = Some(number.clone());
            inner.text = SEARCHING_TEXT.to_string();
            shared.render_locked(&mut inner);
        }

        ControllerShared::ensure_call_listener(shared);
        if shared.config.foreground_gating {
            ControllerShared::ensure_poller(shared);
        } else {
            ControllerShared::restart_auto_dismiss(shared);
        }
        ControllerShared::spawn_lookup(shared, number);
        Ok(())
    }

    /// Push-style telephony signal for collaborators that do not use the
    /// subscription channel.
    pub fn on_call_state(&self, state: CallState) {
        if !state.is_ringing() {
            self.shared.teardown();
        }
    }

    /// Explicit close action from the surface.
    pub fn dismiss(&self) {
        self.shared.teardown();
    }

    pub fn state(&self) -> OverlayState {
        self.shared.inner.lock().unwrap().state
    }

    /// What the surface is currently asked to show, if the window exists.
    pub fn view(&self) -> Option<OverlayView> {
        let inner = self.shared.inner.lock().unwrap();
        if inner.state == OverlayState::Absent {
            return None;
        }
        Some(view_of(&inner))
    }

    /// Instant of the last displayed-state change.
    pub fn last_update(&self) -> Instant {
        self.shared.inner.lock().unwrap().last_update
    }

    /// Tear the overlay down: cancel timers, release the telephony
    /// subscription, remove the window best-effort, and go `Absent`.
    /// Safe to invoke any number of times from any signal source.
    pub fn teardown(&self) {
        self.shared.teardown();
    }
}

impl ControllerShared {
    fn teardown(&self) {
        {
            let mut tasks = self.tasks.lock().unwrap();
            for handle in [
                tasks.auto_dismiss.take(),
                tasks.call_listener.take(),
                tasks.poller.take(),
            ]
            .into_iter()
            .flatten()
            {
                handle.abort();
            }
        }

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state == OverlayState::Absent {
                return;
            }
            inner.state = OverlayState::Absent;
            inner.number = None;
            inner.text.clear();
            inner.last_update = Instant::now();
        }

        self.surface.detach();
        tracing::debug!("Overlay torn down");
    }

    // Renders under the inner lock so updates reach the surface in state
    // order. Surfaces must not call back into the controller from render.
    fn render_locked(&self, inner: &mut Inner) {
        inner.last_update = Instant::now();
        self.surface.render(&view_of(inner));
    }

    fn set_visible(&self, visible: bool) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == OverlayState::Absent {
            return;
        }
        let next = if visible {
            OverlayState::Visible
        } else {
            OverlayState::HiddenPendingForeground
        };
        if inner.state != next {
            tracing::debug!(from = ?inner.state, to = ?next, "Overlay visibility change");
            inner.state = next;
            self.render_locked(&mut inner);
        }
    }

    fn spawn_lookup(this: &Arc<Self>, number: PhoneNumber) {
        let token = this.guard.begin();
        let this = Arc::clone(this);
        tokio::spawn(async move {
            let result = this.cache.lookup(number.as_str()).await;

            if !this.guard.is_current(token) {
                tracing::debug!(number = %number, "Ignoring stale lookup response");
                return;
            }

            if let Ok(insight) = &result {
                if let Err(e) = this.history.save(number.as_str(), &insight.summary).await {
                    tracing::warn!(error = %e, "Failed to record lookup history");
                }
            }

            let mut inner = this.inner.lock().unwrap();
            if inner.state == OverlayState::Absent || !this.guard.is_current(token) {
                return;
            }
            inner.text = match &result {
                Ok(insight) => success_text(insight),
                Err(e) => {
                    tracing::warn!(number = %number, error = %e, "Caller insight lookup failed");
                    LOOKUP_FAILED_TEXT.to_string()
                }
            };
            this.render_locked(&mut inner);
        });
    }

    fn ensure_call_listener(this: &Arc<Self>) {
        let mut tasks = this.tasks.lock().unwrap();
        if tasks.call_listener.is_some() {
            return;
        }
        let mut rx = this.calls.subscribe();
        let this = Arc::clone(this);
        tasks.call_listener = Some(tokio::spawn(async move {
            loop {
                if !rx.borrow_and_update().is_ringing() {
                    this.teardown();
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        }));
    }

    fn restart_auto_dismiss(this: &Arc<Self>) {
        let mut tasks = this.tasks.lock().unwrap();
        if let Some(handle) = tasks.auto_dismiss.take() {
            handle.abort();
        }
        let after = Duration::from_secs(this.config.auto_dismiss_secs);
        let this = Arc::clone(this);
        tasks.auto_dismiss = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::debug!("Auto dismiss overlay");
            this.teardown();
        }));
    }

    fn ensure_poller(this: &Arc<Self>) {
        let mut tasks = this.tasks.lock().unwrap();
        if tasks.poller.is_some() {
            return;
        }
        let this = Arc::clone(this);
        tasks.poller = Some(tokio::spawn(async move {
            this.poll_loop().await;
        }));
    }

    async fn poll_loop(self: Arc<Self>) {
        let mut gate = ForegroundGate::new(
            self.config.foreground_streak_threshold,
            self.config.dialer_packages.clone(),
        );
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            if !self.calls.current().is_ringing() {
                self.teardown();
                return;
            }

            let visible = match self.foreground.as_ref().map(|f| f.top_package()) {
                Some(Ok(top)) => gate.observe(top.as_deref()),
                // Unauthorized (or absent) sampling: stay hidden, keep polling.
                Some(Err(_)) | None => {
                    gate.reset();
                    false
                }
            };
            self.set_visible(visible);
        }
    }
}

fn view_of(inner: &Inner) -> OverlayView {
    OverlayView {
        number: inner
            .number
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_default(),
        text: inner.text.clone(),
        visible: inner.state == OverlayState::Visible,
    }
}

fn success_text(insight: &CallerInsight) -> String {
    let mut text = format!("{}: {}", insight.risk_level, insight.summary);
    if let Some(c) = insight.confidence.as_deref().filter(|c| !c.is_empty()) {
        text.push_str(&format!(" (confidence: {c})"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_text_includes_confidence_when_present() {
        let plain = CallerInsight::new("low", "No reports");
        assert_eq!(success_text(&plain), "low: No reports");

        let with_conf =
            CallerInsight::new("scam_likely", "Reported 12 times").with_confidence("high");
        assert_eq!(
            success_text(&with_conf),
            "scam_likely: Reported 12 times (confidence: high)"
        );
    }
}
