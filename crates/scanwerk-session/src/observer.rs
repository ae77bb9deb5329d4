// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel-backed observer: turns observer callbacks into a stream of
// `SessionEvent`s the UI can consume on its own task.

use scanwerk_bridge::ScanObserver;
use scanwerk_core::{FeedbackSignal, MetricValue, NoResultReason, OutlinePoint};
use tokio::sync::mpsc;

/// Everything a session tells its UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ValidResult { text: String, confidence: u8 },
    NoResult(NoResultReason),
    Report { key: String, value: MetricValue },
    OutlineDetected(Vec<OutlinePoint>),
    InitError(String),
    Feedback(FeedbackSignal),
}

/// [`ScanObserver`] that forwards every callback over an mpsc channel.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SessionEvent>,
    draws_outlines: bool,
}

impl ChannelObserver {
    /// Create an observer and the receiver of its events.
    ///
    /// Outlines are left to the host to draw unless
    /// [`ChannelObserver::drawing_outlines`] is set.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                draws_outlines: false,
            },
            rx,
        )
    }

    /// Claim outline drawing for the UI.
    pub fn drawing_outlines(mut self, draws: bool) -> Self {
        self.draws_outlines = draws;
        self
    }

    fn send(&self, event: SessionEvent) {
        // A UI that stopped listening is not the session's problem.
        let _ = self.tx.send(event);
    }
}

impl ScanObserver for ChannelObserver {
    fn on_valid_result(&mut self, text: &str, confidence: u8) {
        self.send(SessionEvent::ValidResult {
            text: text.to_owned(),
            confidence,
        });
    }

    fn on_no_result(&mut self, reason: &NoResultReason) {
        self.send(SessionEvent::NoResult(reason.clone()));
    }

    fn on_report(&mut self, key: &str, value: &MetricValue) {
        self.send(SessionEvent::Report {
            key: key.to_owned(),
            value: value.clone(),
        });
    }

    fn on_outline_detected(&mut self, points: &[OutlinePoint]) -> bool {
        self.send(SessionEvent::OutlineDetected(points.to_vec()));
        self.draws_outlines
    }

    fn on_init_error(&mut self, message: &str) {
        self.send(SessionEvent::InitError(message.to_owned()));
    }

    fn on_feedback(&mut self, signal: FeedbackSignal) {
        self.send(SessionEvent::Feedback(signal));
    }
}
