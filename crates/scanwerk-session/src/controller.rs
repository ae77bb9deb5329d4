// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session controller — the lifecycle state machine around a recognition
// provider.
//
//   Idle ──start──▶ Scanning ──valid result──▶ ResultDisplayed
//                    ▲   │                         │
//                    │  pause                dismiss_result
//                  start  ▼                        │
//                    └─ Paused        Scanning ◀───┘
//
// Any state ──teardown──▶ Terminated.
//
// Events are processed one at a time, in arrival order, and only while
// Scanning. Events that arrive while stopped are handed back to the provider
// on the next (re)start. The camera is never re-acquired while a release is
// in flight.

use std::sync::Arc;

use chrono::Utc;
use scanwerk_bridge::{
    EventStream, RecognitionProvider, ReleaseHandle, ScanObserver, event_channel,
};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{
    FeedbackSignal, MetricValue, NoResultReason, OutlinePoint, RecognitionEvent, ScanConfig,
    ScanResult, ScanState, SessionId,
};
use tracing::{debug, error, info, trace, warn};

use crate::feedback::FeedbackClassifier;
use crate::lease::CameraLease;
use crate::policy::{ResultPolicy, Verdict};
use crate::session::ScanSession;

/// What the controller did with one event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Not Scanning; the event was dropped.
    Ignored,
    /// Report forwarded to the observer, feedback unchanged.
    Forwarded,
    /// Report forwarded and a new feedback signal emitted.
    Feedback(FeedbackSignal),
    /// Outline forwarded. `handled == false` means the host should draw it.
    Outline { handled: bool },
    /// Result accepted; the session now shows it.
    ValidResult(ScanResult),
    /// Nothing usable in this frame; scanning continues.
    NoResult(NoResultReason),
}

/// Owns one scan session and drives its provider.
pub struct ScanSessionController<P: RecognitionProvider> {
    config: ScanConfig,
    policy: ResultPolicy,
    feedback: FeedbackClassifier,
    provider: P,
    observer: Box<dyn ScanObserver>,
    events: EventStream,
    session: ScanSession,
    lease: Option<CameraLease>,
    pending_release: Option<ReleaseHandle>,
    /// Events received while stopped, in arrival order.
    held_back: Vec<RecognitionEvent>,
    init_failure: Option<Arc<ScanError>>,
}

impl<P: RecognitionProvider> ScanSessionController<P> {
    /// Validate `config`, compile its result policy, and subscribe to the
    /// provider's events. The provider is not started.
    pub fn new(
        mut provider: P,
        config: ScanConfig,
        observer: impl ScanObserver + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let policy = ResultPolicy::from_config(&config)?;
        let feedback = FeedbackClassifier::new(config.feedback.clone());

        let (sink, events) = event_channel();
        provider.subscribe(sink);

        let session = ScanSession::new();
        debug!(session = %session.id, provider = provider.name(), "scan session created");

        Ok(Self {
            config,
            policy,
            feedback,
            provider,
            observer: Box::new(observer),
            events,
            session,
            lease: None,
            pending_release: None,
            held_back: Vec::new(),
            init_failure: None,
        })
    }

    pub fn id(&self) -> SessionId {
        self.session.id
    }

    pub fn state(&self) -> ScanState {
        self.session.state
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether the camera is held or its release is still in flight.
    pub fn holds_camera(&self) -> bool {
        self.lease.is_some() || self.pending_release.is_some()
    }

    // -- Lifecycle --

    /// Begin (or resume) scanning.
    ///
    /// Returns [`ScanError::AlreadyRunning`] when already Scanning; callers
    /// may ignore it (see [`ScanError::is_ignorable`]).
    pub async fn start(&mut self) -> Result<()> {
        if self.session.state == ScanState::Terminated {
            return Err(ScanError::Terminated);
        }
        if !self.session.state.can_start() {
            debug!(session = %self.session.id, "start ignored: already scanning");
            return Err(ScanError::AlreadyRunning);
        }
        if let Some(source) = &self.init_failure {
            return Err(ScanError::InitFailed {
                source: Arc::clone(source),
            });
        }

        self.await_pending_release().await;
        self.return_unprocessed_events();
        self.launch_provider()?;
        self.enter_scanning();
        Ok(())
    }

    /// Stop scanning and release the camera. Returns once it is released.
    ///
    /// No-op unless Scanning or ResultDisplayed.
    pub async fn pause(&mut self) {
        match self.session.state {
            ScanState::Scanning | ScanState::ResultDisplayed => {}
            state => {
                debug!(session = %self.session.id, ?state, "pause ignored");
                return;
            }
        }

        self.provider.cancel();
        self.set_state(ScanState::Paused);
        self.release_camera();
        self.await_pending_release().await;
    }

    /// Hide the displayed result and resume scanning.
    ///
    /// No-op unless ResultDisplayed.
    pub async fn dismiss_result(&mut self) -> Result<()> {
        match self.session.state {
            ScanState::ResultDisplayed => {}
            ScanState::Terminated => return Err(ScanError::Terminated),
            state => {
                debug!(session = %self.session.id, ?state, "dismiss ignored: no result shown");
                return Ok(());
            }
        }

        self.await_pending_release().await;
        self.return_unprocessed_events();
        if !self.provider.is_running() {
            self.launch_provider()?;
        }
        self.enter_scanning();
        Ok(())
    }

    /// Stop the provider and release every resource. Idempotent.
    pub async fn teardown(&mut self) {
        if self.session.state == ScanState::Terminated {
            return;
        }

        self.provider.cancel();
        self.release_camera();
        self.await_pending_release().await;
        self.held_back.clear();
        let dropped = self.events.drain_pending().len();
        if dropped > 0 {
            debug!(session = %self.session.id, dropped, "dropped undelivered events");
        }
        self.set_state(ScanState::Terminated);
        info!(session = %self.session.id, "scan session torn down");
    }

    // -- Event processing --

    /// Process every event already queued, in arrival order.
    pub fn drain_events(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.events.try_next() {
            outcomes.push(self.on_event(event));
        }
        outcomes
    }

    /// Wait for the next provider event and process it.
    ///
    /// Returns `None` once the provider has dropped its event sink.
    pub async fn next_event(&mut self) -> Option<EventOutcome> {
        let event = self.events.next().await?;
        Some(self.on_event(event))
    }

    /// Apply one provider event to the session.
    pub fn on_event(&mut self, event: RecognitionEvent) -> EventOutcome {
        match self.session.state {
            ScanState::Scanning => {}
            ScanState::Terminated => return EventOutcome::Ignored,
            state => {
                trace!(
                    session = %self.session.id,
                    kind = event.kind(),
                    ?state,
                    "event held back outside Scanning"
                );
                self.held_back.push(event);
                return EventOutcome::Ignored;
            }
        }

        match event {
            RecognitionEvent::Report { key, value } => self.handle_report(&key, &value),
            RecognitionEvent::OutlineDetected { points } => self.handle_outline(&points),
            RecognitionEvent::Result { text, confidence } => self.handle_result(&text, confidence),
            RecognitionEvent::Aborted { reason, message } => {
                self.no_result(NoResultReason::Aborted { reason, message })
            }
        }
    }

    fn handle_report(&mut self, key: &str, value: &MetricValue) -> EventOutcome {
        self.observer.on_report(key, value);

        match self.feedback.observe(key, value) {
            Some(signal) => {
                self.session.last_feedback = signal;
                self.observer.on_feedback(signal);
                debug!(session = %self.session.id, ?signal, "capture feedback");
                EventOutcome::Feedback(signal)
            }
            None => EventOutcome::Forwarded,
        }
    }

    fn handle_outline(&mut self, points: &[OutlinePoint]) -> EventOutcome {
        let handled = self.observer.on_outline_detected(points);
        EventOutcome::Outline { handled }
    }

    fn handle_result(&mut self, text: &str, confidence: u8) -> EventOutcome {
        match self.policy.evaluate(text, confidence) {
            Verdict::Accept(text) => {
                let result = ScanResult::new(text, confidence);
                // Stop frame processing while the result is shown; the camera
                // stays acquired.
                self.provider.cancel();
                self.set_state(ScanState::ResultDisplayed);
                self.session.last_result = Some(result.clone());
                self.session.last_feedback = FeedbackSignal::None;
                info!(
                    session = %self.session.id,
                    text = %result.text,
                    confidence,
                    "valid result"
                );
                self.observer.on_valid_result(&result.text, result.confidence);
                EventOutcome::ValidResult(result)
            }
            Verdict::Reject(reason) => self.no_result(reason),
        }
    }

    fn no_result(&mut self, reason: NoResultReason) -> EventOutcome {
        trace!(session = %self.session.id, %reason, "no result");
        self.observer.on_no_result(&reason);
        EventOutcome::NoResult(reason)
    }

    // -- Provider / camera --

    fn launch_provider(&mut self) -> Result<()> {
        if let Err(e) = self.provider.start(&self.config) {
            let message = e.to_string();
            error!(
                session = %self.session.id,
                provider = self.provider.name(),
                error = %message,
                "recognition provider failed to initialise"
            );
            let source = Arc::new(e);
            self.init_failure = Some(Arc::clone(&source));
            self.observer.on_init_error(&message);
            return Err(ScanError::Init { source });
        }

        if self.lease.is_none() {
            self.lease = Some(CameraLease::acquire(self.provider.name()));
        }
        Ok(())
    }

    fn enter_scanning(&mut self) {
        self.feedback.reset();
        self.session.last_feedback = FeedbackSignal::None;
        self.session.started_at = Some(Utc::now());
        self.set_state(ScanState::Scanning);
    }

    fn release_camera(&mut self) {
        let handle = self.provider.release_resource_async();
        if let Some(lease) = self.lease.take() {
            lease.surrender();
        }
        self.pending_release = Some(handle);
    }

    /// Wait for an in-flight release. The handle stays stored until it
    /// completes, so a cancelled wait is resumed by the next caller.
    async fn await_pending_release(&mut self) {
        if let Some(handle) = self.pending_release.as_mut() {
            handle.wait().await;
            debug!(session = %self.session.id, "camera release completed");
        }
        self.pending_release = None;
    }

    /// Give the provider back everything it delivered that was never
    /// processed, so a restart continues from the first unhandled frame.
    fn return_unprocessed_events(&mut self) {
        let mut unprocessed = std::mem::take(&mut self.held_back);
        unprocessed.extend(self.events.drain_pending());
        if unprocessed.is_empty() {
            return;
        }
        debug!(
            session = %self.session.id,
            count = unprocessed.len(),
            "returning unprocessed events to provider"
        );
        self.provider.requeue(unprocessed);
    }

    fn set_state(&mut self, next: ScanState) {
        let previous = self.session.state;
        if previous != next {
            debug!(session = %self.session.id, from = ?previous, to = ?next, "state transition");
            self.session.state = next;
        }
    }
}

impl<P: RecognitionProvider> Drop for ScanSessionController<P> {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            warn!(
                session = %self.session.id,
                provider = lease.provider(),
                "session dropped while holding the camera; releasing"
            );
            self.provider.cancel();
            let _ = self.provider.release_resource_async();
            lease.surrender();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use scanwerk_bridge::{ReplayProbe, ReplayProvider, StubProvider};
    use scanwerk_core::human_errors::{Severity, humanize_error};
    use scanwerk_core::{AbortReason, BRIGHTNESS_METRIC, SHAKE_WARNING_METRIC};
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::observer::{ChannelObserver, SessionEvent};

    const IBAN: &str = "DE89370400440532013000";

    type Controller = ScanSessionController<ReplayProvider>;

    fn iban_config() -> ScanConfig {
        ScanConfig {
            min_confidence: 65,
            validation_regex: Some(r"^[A-Z]{2}([0-9A-Z]\s*){13,32}$".into()),
            ..ScanConfig::default()
        }
    }

    fn controller_with(
        provider: ReplayProvider,
        config: ScanConfig,
    ) -> (Controller, ReplayProbe, UnboundedReceiver<SessionEvent>) {
        let probe = provider.probe();
        let (observer, rx) = ChannelObserver::channel();
        let controller = ScanSessionController::new(provider, config, observer).unwrap();
        (controller, probe, rx)
    }

    fn controller() -> (Controller, ReplayProbe, UnboundedReceiver<SessionEvent>) {
        controller_with(
            ReplayProvider::new(Vec::new()).with_release_delay(Duration::from_millis(10)),
            iban_config(),
        )
    }

    fn collected(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn result(text: &str, confidence: u8) -> RecognitionEvent {
        RecognitionEvent::Result {
            text: text.into(),
            confidence,
        }
    }

    #[tokio::test]
    async fn valid_result_is_displayed_once() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();

        let outcome = c.on_event(result(IBAN, 70));
        assert!(matches!(outcome, EventOutcome::ValidResult(ref r) if r.text == IBAN));
        assert_eq!(c.state(), ScanState::ResultDisplayed);
        assert_eq!(c.session().last_result.as_ref().map(|r| r.confidence), Some(70));

        // A second result while the first is shown changes nothing.
        assert_eq!(c.on_event(result(IBAN, 90)), EventOutcome::Ignored);

        assert_eq!(
            collected(&mut rx),
            vec![SessionEvent::ValidResult {
                text: IBAN.into(),
                confidence: 70
            }]
        );
    }

    #[tokio::test]
    async fn low_confidence_keeps_scanning() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();

        for confidence in [0, 30, 64] {
            let outcome = c.on_event(result(IBAN, confidence));
            assert!(matches!(
                outcome,
                EventOutcome::NoResult(NoResultReason::LowConfidence { .. })
            ));
            assert_eq!(c.state(), ScanState::Scanning);
        }
        assert_eq!(collected(&mut rx).len(), 3);
    }

    #[tokio::test]
    async fn invalid_text_is_a_no_result() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();

        let outcome = c.on_event(result("HELLO", 99));
        assert!(matches!(
            outcome,
            EventOutcome::NoResult(NoResultReason::ValidationFailed { .. })
        ));
        assert_eq!(c.state(), ScanState::Scanning);
        assert!(matches!(
            collected(&mut rx).as_slice(),
            [SessionEvent::NoResult(NoResultReason::ValidationFailed { .. })]
        ));
    }

    #[tokio::test]
    async fn aborted_run_keeps_scanning() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();

        let outcome = c.on_event(RecognitionEvent::Aborted {
            reason: AbortReason::NoLinesFound,
            message: "empty cutout".into(),
        });
        assert!(matches!(outcome, EventOutcome::NoResult(NoResultReason::Aborted { .. })));
        assert_eq!(c.state(), ScanState::Scanning);
        assert_eq!(collected(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn start_while_scanning_is_ignorable() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();

        let err = c.start().await.unwrap_err();
        assert!(matches!(err, ScanError::AlreadyRunning));
        assert!(err.is_ignorable());
        assert_eq!(probe.snapshot().starts, 1);
        assert_eq!(c.state(), ScanState::Scanning);
    }

    #[tokio::test]
    async fn dismiss_only_acts_on_displayed_result() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();

        c.dismiss_result().await.unwrap();
        assert_eq!(c.state(), ScanState::Scanning);
        assert_eq!(probe.snapshot().starts, 1);

        c.on_event(result(IBAN, 70));
        assert!(!c.provider().is_running());

        c.dismiss_result().await.unwrap();
        assert_eq!(c.state(), ScanState::Scanning);
        assert_eq!(probe.snapshot().starts, 2);
        assert!(c.provider().is_running());
    }

    #[tokio::test]
    async fn pause_releases_before_returning() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();
        assert!(c.holds_camera());

        c.pause().await;
        assert_eq!(c.state(), ScanState::Paused);
        assert!(!c.holds_camera());
        let state = probe.snapshot();
        assert!(!state.camera_held);
        assert_eq!(state.cancels, 1);
        assert_eq!(state.releases_completed, 1);
    }

    #[tokio::test]
    async fn pause_then_start_never_double_acquires() {
        let (mut c, probe, _rx) = controller();
        for _ in 0..5 {
            c.start().await.unwrap();
            c.pause().await;
        }
        c.start().await.unwrap();

        let state = probe.snapshot();
        assert!(!state.double_acquire);
        assert_eq!(state.starts, 6);
        assert_eq!(state.releases_completed, 5);
    }

    #[tokio::test]
    async fn cancelled_pause_still_blocks_reacquire() {
        let (mut c, probe, _rx) = controller_with(
            ReplayProvider::new(Vec::new()).with_release_delay(Duration::from_millis(30)),
            iban_config(),
        );
        c.start().await.unwrap();

        // The pause future is dropped before the release completes.
        let cancelled = tokio::time::timeout(Duration::from_millis(1), c.pause()).await;
        assert!(cancelled.is_err());
        assert_eq!(c.state(), ScanState::Paused);
        assert!(c.holds_camera());

        c.start().await.unwrap();
        let state = probe.snapshot();
        assert!(!state.double_acquire);
        assert_eq!(state.releases_completed, 1);
        assert_eq!(state.starts, 2);
    }

    #[tokio::test]
    async fn init_error_is_surfaced_once() {
        let (mut c, probe, mut rx) = controller_with(
            ReplayProvider::new(Vec::new()).failing_with("license key invalid"),
            iban_config(),
        );

        let first = c.start().await.unwrap_err();
        assert!(matches!(first, ScanError::Init { .. }));
        assert!(first.to_string().contains("license key invalid"));
        assert!(humanize_error(&first).message.contains("license"));
        let second = c.start().await.unwrap_err();
        assert!(matches!(second, ScanError::InitFailed { .. }));
        assert!(second.is_fatal());

        assert_eq!(c.state(), ScanState::Idle);
        assert_eq!(probe.snapshot().starts, 0);
        let events = collected(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::InitError(_)));
    }

    #[tokio::test]
    async fn init_error_keeps_the_provider_error() {
        let (observer, mut rx) = ChannelObserver::channel();
        let mut c = ScanSessionController::new(StubProvider, iban_config(), observer).unwrap();

        let err = c.start().await.unwrap_err();
        let ScanError::Init { source } = &err else {
            panic!("expected init error, got {err:?}");
        };
        assert!(matches!(source.as_ref(), ScanError::PlatformUnavailable));

        let human = humanize_error(&err);
        assert_eq!(human.message, "Text scanning isn't available on this device.");
        assert_eq!(human.severity, Severity::Permanent);

        // The latched error still names the original cause.
        let again = c.start().await.unwrap_err();
        assert_eq!(humanize_error(&again).message, human.message);
        assert_eq!(collected(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn events_outside_scanning_are_ignored() {
        let (mut c, _probe, mut rx) = controller();
        assert_eq!(c.on_event(result(IBAN, 99)), EventOutcome::Ignored);

        c.start().await.unwrap();
        c.pause().await;
        assert_eq!(c.on_event(result(IBAN, 99)), EventOutcome::Ignored);
        assert!(collected(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn outline_return_value_passes_through() {
        let provider = ReplayProvider::new(Vec::new());
        let (observer, mut rx) = ChannelObserver::channel();
        let mut c =
            ScanSessionController::new(provider, iban_config(), observer.drawing_outlines(true))
                .unwrap();
        c.start().await.unwrap();

        let points = vec![OutlinePoint { x: 0.0, y: 0.0 }, OutlinePoint { x: 10.0, y: 4.0 }];
        let outcome = c.on_event(RecognitionEvent::OutlineDetected {
            points: points.clone(),
        });
        assert_eq!(outcome, EventOutcome::Outline { handled: true });
        assert_eq!(collected(&mut rx), vec![SessionEvent::OutlineDetected(points)]);

        let (mut c, _probe, _rx) = controller();
        c.start().await.unwrap();
        let outcome = c.on_event(RecognitionEvent::OutlineDetected { points: Vec::new() });
        assert_eq!(outcome, EventOutcome::Outline { handled: false });
    }

    #[tokio::test]
    async fn reports_are_forwarded_and_classified() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();

        let brightness = RecognitionEvent::Report {
            key: BRIGHTNESS_METRIC.into(),
            value: MetricValue::Number(20.0),
        };
        assert_eq!(c.on_event(brightness), EventOutcome::Feedback(FeedbackSignal::TooDark));
        assert_eq!(c.session().last_feedback, FeedbackSignal::TooDark);

        let shake = RecognitionEvent::Report {
            key: SHAKE_WARNING_METRIC.into(),
            value: MetricValue::Flag(true),
        };
        assert_eq!(c.on_event(shake), EventOutcome::Feedback(FeedbackSignal::Shaky));

        let sharpness = RecognitionEvent::Report {
            key: "$sharpness".into(),
            value: MetricValue::Integer(71),
        };
        assert_eq!(c.on_event(sharpness), EventOutcome::Forwarded);

        let events = collected(&mut rx);
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], SessionEvent::Report { .. }));
        assert_eq!(events[1], SessionEvent::Feedback(FeedbackSignal::TooDark));
        assert_eq!(events[3], SessionEvent::Feedback(FeedbackSignal::Shaky));
    }

    #[tokio::test]
    async fn teardown_is_idempotent_and_final() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();

        c.teardown().await;
        c.teardown().await;
        assert_eq!(c.state(), ScanState::Terminated);
        assert!(!c.holds_camera());
        assert_eq!(probe.snapshot().releases_completed, 1);

        assert!(matches!(c.start().await, Err(ScanError::Terminated)));
        assert!(matches!(c.dismiss_result().await, Err(ScanError::Terminated)));
        assert_eq!(c.on_event(result(IBAN, 99)), EventOutcome::Ignored);
    }

    #[tokio::test]
    async fn pause_from_result_keeps_the_result() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();
        c.on_event(result(IBAN, 70));

        c.pause().await;
        assert_eq!(c.state(), ScanState::Paused);
        assert!(c.session().last_result.is_some());
        assert!(!probe.snapshot().camera_held);
    }

    #[tokio::test]
    async fn replayed_script_reaches_a_result() {
        let script = vec![
            RecognitionEvent::Aborted {
                reason: AbortReason::NoTextFound,
                message: String::new(),
            },
            result("DE12", 80),
            result(IBAN, 70),
        ];
        let (mut c, _probe, mut rx) =
            controller_with(ReplayProvider::new(script), iban_config());
        c.start().await.unwrap();

        let mut outcomes = Vec::new();
        while c.state() == ScanState::Scanning {
            match c.next_event().await {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[2], EventOutcome::ValidResult(_)));

        let valid = collected(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::ValidResult { .. }))
            .count();
        assert_eq!(valid, 1);
    }

    #[tokio::test]
    async fn events_left_over_at_pause_are_replayed_on_restart() {
        let (mut c, _probe, mut rx) = controller();
        c.start().await.unwrap();
        c.pause().await;

        // Frames that reached the session after the provider was stopped.
        assert_eq!(c.on_event(result("DE12", 99)), EventOutcome::Ignored);
        assert_eq!(c.on_event(result(IBAN, 99)), EventOutcome::Ignored);
        assert!(collected(&mut rx).is_empty());

        c.start().await.unwrap();
        assert!(matches!(
            c.next_event().await,
            Some(EventOutcome::NoResult(NoResultReason::ValidationFailed { .. }))
        ));
        assert!(matches!(
            c.next_event().await,
            Some(EventOutcome::ValidResult(ref r)) if r.text == IBAN
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn dismissing_results_never_loses_frames() {
        let mut script = Vec::new();
        for i in 0..20 {
            script.push(RecognitionEvent::Aborted {
                reason: AbortReason::NoTextFound,
                message: format!("frame {i}"),
            });
            script.push(result(IBAN, 70 + i));
        }
        let (mut c, _probe, _rx) = controller_with(ReplayProvider::new(script), iban_config());
        c.start().await.unwrap();

        let mut confidences = Vec::new();
        let mut aborted = 0;
        while confidences.len() < 20 {
            let next = tokio::time::timeout(Duration::from_secs(2), c.next_event()).await;
            match next {
                Ok(Some(EventOutcome::ValidResult(r))) => {
                    confidences.push(r.confidence);
                    c.dismiss_result().await.unwrap();
                }
                Ok(Some(EventOutcome::NoResult(_))) => aborted += 1,
                Ok(Some(other)) => panic!("unexpected outcome: {other:?}"),
                Ok(None) | Err(_) => break,
            }
        }

        let expected: Vec<u8> = (0..20).map(|i| 70 + i).collect();
        assert_eq!(confidences, expected);
        assert_eq!(aborted, 20);
        c.teardown().await;
    }

    #[tokio::test]
    async fn dropping_a_scanning_controller_releases_the_camera() {
        let (mut c, probe, _rx) = controller();
        c.start().await.unwrap();
        drop(c);

        let state = probe.snapshot();
        assert!(state.release_pending || !state.camera_held);
        assert_eq!(state.releases_requested, 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ScanConfig {
            min_char_height: 50,
            max_char_height: 10,
            ..ScanConfig::default()
        };
        let (observer, _rx) = ChannelObserver::channel();
        let result = ScanSessionController::new(ReplayProvider::new(Vec::new()), config, observer);
        assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
    }
}
