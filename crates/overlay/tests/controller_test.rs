use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use caller_insight_core::config::OverlayConfig;
use caller_insight_core::mocks::{
    MockCallStateSource, MockForegroundSource, MockHistorySink, MockInsightClient,
    MockOverlaySurface,
};
use caller_insight_core::{
    CallState, CallerInsight, Error, InsightClient, PhoneNumber, Result,
};
use caller_insight_lookup::InsightCache;
use caller_insight_overlay::{OverlayController, OverlayState};

const TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DIALER: &str = "com.android.dialer";

struct SlowClient {
    delays: HashMap<String, Duration>,
}

impl SlowClient {
    fn new(delays: &[(&str, u64)]) -> Self {
        Self {
            delays: delays
                .iter()
                .map(|(n, ms)| (n.to_string(), Duration::from_millis(*ms)))
                .collect(),
        }
    }
}

#[async_trait]
impl InsightClient for SlowClient {
    async fn analyze(&self, number: &PhoneNumber) -> Result<CallerInsight> {
        if let Some(delay) = self.delays.get(number.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        Ok(CallerInsight::new("low", format!("summary for {number}")))
    }
}

struct Harness {
    controller: OverlayController,
    surface: Arc<MockOverlaySurface>,
    calls: Arc<MockCallStateSource>,
    foreground: Arc<MockForegroundSource>,
    history: Arc<MockHistorySink>,
}

fn harness(gating: bool, client: Arc<dyn InsightClient>) -> Harness {
    harness_with_surface(gating, client, Arc::new(MockOverlaySurface::new()))
}

fn harness_with_surface(
    gating: bool,
    client: Arc<dyn InsightClient>,
    surface: Arc<MockOverlaySurface>,
) -> Harness {
    let config = OverlayConfig {
        auto_dismiss_secs: 60,
        foreground_gating: gating,
        poll_interval_ms: 350,
        foreground_streak_threshold: 3,
        dialer_packages: vec![DIALER.to_string()],
    };
    let calls = Arc::new(MockCallStateSource::new(CallState::Ringing));
    let foreground = Arc::new(MockForegroundSource::new());
    let history = Arc::new(MockHistorySink::new());
    let cache = Arc::new(InsightCache::new(client, TTL));

    let controller = OverlayController::new(
        config,
        surface.clone(),
        cache,
        history.clone(),
        calls.clone(),
    )
    .with_foreground_source(foreground.clone());

    Harness {
        controller,
        surface,
        calls,
        foreground,
        history,
    }
}

#[tokio::test(start_paused = true)]
async fn incoming_call_shows_searching_then_summary_and_records_history() {
    let client = Arc::new(MockInsightClient::constant(
        CallerInsight::new("scam_likely", "Reported 12 times").with_confidence("high"),
    ));
    let h = harness(false, client);

    h.controller.on_incoming_call("+976 99-112233").unwrap();

    let view = h.controller.view().unwrap();
    assert_eq!(h.controller.state(), OverlayState::Visible);
    assert_eq!(view.number, "+97699112233");
    assert_eq!(view.text, "Searching…");
    assert!(view.visible);

    tokio::time::sleep(Duration::from_millis(5)).await;

    let view = h.controller.view().unwrap();
    assert_eq!(
        view.text,
        "scam_likely: Reported 12 times (confidence: high)"
    );
    assert_eq!(
        h.history.saved(),
        vec![("+97699112233".to_string(), "Reported 12 times".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn second_call_updates_subject_in_place_and_suppresses_the_stale_result() {
    let client = Arc::new(SlowClient::new(&[("11111111", 500), ("22222222", 50)]));
    let h = harness(false, client);

    h.controller.on_incoming_call("11111111").unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.controller.on_incoming_call("22222222").unwrap();

    // B resolves at ~60 ms, A at ~500 ms; wait out both.
    tokio::time::sleep(Duration::from_millis(600)).await;

    let view = h.controller.view().unwrap();
    assert_eq!(view.number, "22222222", "subject replaced in the same window");
    assert_eq!(
        view.text, "low: summary for 22222222",
        "A's late result must not overwrite B's"
    );
    assert_eq!(h.history.saved(), vec![(
        "22222222".to_string(),
        "summary for 22222222".to_string()
    )]);
}

#[tokio::test(start_paused = true)]
async fn call_ended_teardown_is_idempotent() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(false, client);

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(h.surface.is_attached());

    h.controller.on_call_state(CallState::Idle);
    h.controller.on_call_state(CallState::Idle);
    h.controller.dismiss();

    assert_eq!(h.controller.state(), OverlayState::Absent);
    assert_eq!(h.controller.view(), None);
    assert!(!h.surface.is_attached());
}

#[tokio::test(start_paused = true)]
async fn telephony_subscription_tears_down_on_idle() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(false, client);

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    h.calls.set(CallState::Idle);
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(h.controller.state(), OverlayState::Absent);
    assert!(!h.surface.is_attached());
}

#[tokio::test(start_paused = true)]
async fn missing_overlay_permission_fails_closed() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness_with_surface(
        false,
        client,
        Arc::new(MockOverlaySurface::without_permission()),
    );

    let err = h.controller.on_incoming_call("99112233").unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));
    assert_eq!(h.controller.state(), OverlayState::Absent);
    assert_eq!(h.surface.render_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn lookup_failure_shows_a_terminal_message() {
    let client = Arc::new(MockInsightClient::failing(Error::network("unreachable")));
    let h = harness(false, client);

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(h.controller.view().unwrap().text, "Lookup failed");
    assert!(h.history.saved().is_empty(), "failures are not recorded");
}

#[tokio::test(start_paused = true)]
async fn overlay_auto_dismisses_after_the_configured_interval() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(false, client);

    h.controller.on_incoming_call("99112233").unwrap();

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(h.controller.state(), OverlayState::Visible);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.controller.state(), OverlayState::Absent);
    assert!(!h.surface.is_attached());
}

#[tokio::test(start_paused = true)]
async fn gating_shows_only_after_three_consecutive_dialer_polls() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(true, client);
    h.foreground.set_top(Some(DIALER));

    h.controller.on_incoming_call("99112233").unwrap();
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);

    tokio::time::sleep(Duration::from_millis(10)).await; // poll 1
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);

    tokio::time::sleep(Duration::from_millis(350)).await; // poll 2
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);

    tokio::time::sleep(Duration::from_millis(350)).await; // poll 3
    assert_eq!(h.controller.state(), OverlayState::Visible);

    // Dialer leaves the foreground again: hide on the next poll.
    h.foreground.set_top(Some("com.example.game"));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);
}

#[tokio::test(start_paused = true)]
async fn gating_mismatch_resets_the_streak() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(true, client);
    h.foreground.set_top(Some(DIALER));

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await; // poll 1: match
    tokio::time::sleep(Duration::from_millis(350)).await; // poll 2: match

    h.foreground.set_top(Some("com.example.game"));
    tokio::time::sleep(Duration::from_millis(350)).await; // poll 3: mismatch
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);

    h.foreground.set_top(Some(DIALER));
    tokio::time::sleep(Duration::from_millis(700)).await; // polls 4-5: match
    assert_eq!(
        h.controller.state(),
        OverlayState::HiddenPendingForeground,
        "two matches after a reset are not enough"
    );
}

#[tokio::test(start_paused = true)]
async fn gating_unauthorized_sampling_keeps_the_overlay_hidden_but_polling() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(true, client);
    h.foreground.deny();

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.controller.state(), OverlayState::HiddenPendingForeground);

    // Access granted later: the loop is still alive and the gate opens.
    h.foreground.set_top(Some(DIALER));
    tokio::time::sleep(Duration::from_millis(3 * 350 + 10)).await;
    assert_eq!(h.controller.state(), OverlayState::Visible);
}

#[tokio::test(start_paused = true)]
async fn gating_poll_tears_down_once_the_call_stops_ringing() {
    let client = Arc::new(MockInsightClient::constant(CallerInsight::new("low", "ok")));
    let h = harness(true, client);
    h.foreground.set_top(Some(DIALER));

    h.controller.on_incoming_call("99112233").unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    h.calls.set(CallState::OffHook);
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(h.controller.state(), OverlayState::Absent);
    assert!(!h.surface.is_attached());
}
