//! Mock implementations of core traits for testing.
//!
//! These cover the cross-crate cases; tests with more specialized timing
//! needs define their own mocks locally.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::traits::{
    CallStateSource, ForegroundSource, HistoryEntry, HistorySink, InsightClient, OverlaySurface,
    OverlayView,
};
use crate::types::{CallState, CallerInsight, PhoneNumber};

// =============================================================================
// Mock Insight Client
// =============================================================================

/// Scripted insight client that returns predefined outcomes.
pub struct MockInsightClient {
    responses: Mutex<Vec<Result<CallerInsight>>>,
    call_count: Mutex<usize>,
}

impl MockInsightClient {
    /// Create a mock with a queue of outcomes, replayed cyclically.
    pub fn new(responses: Vec<Result<CallerInsight>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// A mock that always returns the same record.
    pub fn constant(insight: CallerInsight) -> Self {
        Self::new(vec![Ok(insight)])
    }

    /// A mock that always fails with the given error.
    pub fn failing(error: Error) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of `analyze` calls made so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl InsightClient for MockInsightClient {
    async fn analyze(&self, _number: &PhoneNumber) -> Result<CallerInsight> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        let idx = (*count - 1) % responses.len().max(1);
        responses
            .get(idx)
            .cloned()
            .unwrap_or_else(|| Ok(CallerInsight::new("unknown", "No info")))
    }
}

// =============================================================================
// Mock Call State Source
// =============================================================================

/// Call-state source whose state tests flip by hand.
pub struct MockCallStateSource {
    tx: watch::Sender<CallState>,
}

impl MockCallStateSource {
    pub fn new(initial: CallState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Transition to a new call state, notifying subscribers.
    pub fn set(&self, state: CallState) {
        let _ = self.tx.send(state);
    }
}

impl CallStateSource for MockCallStateSource {
    fn current(&self) -> CallState {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<CallState> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Mock Foreground Source
// =============================================================================

/// Foreground source whose answer tests set by hand.
pub struct MockForegroundSource {
    top: Mutex<Result<Option<String>>>,
}

impl MockForegroundSource {
    pub fn new() -> Self {
        Self {
            top: Mutex::new(Ok(None)),
        }
    }

    /// Set the package reported as foreground.
    pub fn set_top(&self, package: Option<&str>) {
        *self.top.lock().unwrap() = Ok(package.map(str::to_string));
    }

    /// Make the source report that usage access is not granted.
    pub fn deny(&self) {
        *self.top.lock().unwrap() = Err(Error::permission_denied("usage access not granted"));
    }
}

impl Default for MockForegroundSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundSource for MockForegroundSource {
    fn top_package(&self) -> Result<Option<String>> {
        self.top.lock().unwrap().clone()
    }
}

// =============================================================================
// Mock Overlay Surface
// =============================================================================

/// Surface that records every render it receives.
pub struct MockOverlaySurface {
    fail_attach: bool,
    attached: Mutex<bool>,
    renders: Mutex<Vec<OverlayView>>,
}

impl MockOverlaySurface {
    pub fn new() -> Self {
        Self {
            fail_attach: false,
            attached: Mutex::new(false),
            renders: Mutex::new(Vec::new()),
        }
    }

    /// A surface whose `attach` fails as if the display permission were
    /// missing.
    pub fn without_permission() -> Self {
        Self {
            fail_attach: true,
            ..Self::new()
        }
    }

    pub fn is_attached(&self) -> bool {
        *self.attached.lock().unwrap()
    }

    /// The most recent view, if any render happened.
    pub fn last_view(&self) -> Option<OverlayView> {
        self.renders.lock().unwrap().last().cloned()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }
}

impl Default for MockOverlaySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySurface for MockOverlaySurface {
    fn attach(&self) -> Result<()> {
        if self.fail_attach {
            return Err(Error::permission_denied("overlay permission not granted"));
        }
        *self.attached.lock().unwrap() = true;
        Ok(())
    }

    fn render(&self, view: &OverlayView) {
        self.renders.lock().unwrap().push(view.clone());
    }

    fn detach(&self) {
        *self.attached.lock().unwrap() = false;
    }
}

// =============================================================================
// Mock History Sink
// =============================================================================

/// History sink that keeps saves in memory for assertions.
#[derive(Default)]
pub struct MockHistorySink {
    saved: Mutex<Vec<(String, String)>>,
}

impl MockHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(number, summary)` pairs saved so far, in call order.
    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySink for MockHistorySink {
    async fn save(&self, number: &str, summary: &str) -> Result<()> {
        self.saved
            .lock()
            .unwrap()
            .push((number.to_string(), summary.to_string()));
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|(number, summary)| HistoryEntry {
                number: number.clone(),
                summary: summary.clone(),
                timestamp_ms: 0,
            })
            .collect())
    }
}
