// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Observer that writes every session callback to the log.

use scanwerk_bridge::ScanObserver;
use scanwerk_core::{FeedbackSignal, MetricValue, NoResultReason, OutlinePoint};
use tracing::{debug, error, info, trace};

/// Logs session callbacks; leaves outline drawing to the host.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ScanObserver for LogObserver {
    fn on_valid_result(&mut self, text: &str, confidence: u8) {
        info!(text, confidence, "result");
    }

    fn on_no_result(&mut self, reason: &NoResultReason) {
        debug!(%reason, "no result");
    }

    fn on_report(&mut self, key: &str, value: &MetricValue) {
        trace!(key, %value, "report");
    }

    fn on_outline_detected(&mut self, points: &[OutlinePoint]) -> bool {
        trace!(points = points.len(), "text outline");
        false
    }

    fn on_init_error(&mut self, message: &str) {
        error!(message, "scanner failed to start");
    }

    fn on_feedback(&mut self, signal: FeedbackSignal) {
        if let Some(hint) = signal.hint() {
            info!(?signal, hint, "feedback");
        }
    }
}
