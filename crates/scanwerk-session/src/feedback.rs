// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture feedback — maps provider metrics to a small set of hints and
// debounces them so per-frame reports do not make the hint flicker.
//
// Shake warnings win over brightness hints inside the debounce window.

use std::time::{Duration, Instant};

use scanwerk_core::{
    BRIGHTNESS_METRIC, FeedbackConfig, FeedbackSignal, MetricValue, SHAKE_WARNING_METRIC,
};
use tracing::trace;

/// Map one metric to a feedback signal. Unknown metrics map to
/// [`FeedbackSignal::None`].
pub fn classify(config: &FeedbackConfig, metric: &str, value: &MetricValue) -> FeedbackSignal {
    match metric {
        SHAKE_WARNING_METRIC => FeedbackSignal::Shaky,
        BRIGHTNESS_METRIC => match value.as_f64() {
            Some(b) if b < config.too_dark_below => FeedbackSignal::TooDark,
            Some(b) if b > config.too_bright_above => FeedbackSignal::TooBright,
            Some(_) => FeedbackSignal::Ok,
            None => FeedbackSignal::None,
        },
        _ => FeedbackSignal::None,
    }
}

/// Classifier plus debounce state.
#[derive(Debug, Clone)]
pub struct FeedbackClassifier {
    config: FeedbackConfig,
    min_interval: Duration,
    last: Option<(FeedbackSignal, Instant)>,
}

impl FeedbackClassifier {
    pub fn new(config: FeedbackConfig) -> Self {
        let min_interval = config.min_interval();
        Self {
            config,
            min_interval,
            last: None,
        }
    }

    /// Classify without touching the debounce state.
    pub fn classify(&self, metric: &str, value: &MetricValue) -> FeedbackSignal {
        classify(&self.config, metric, value)
    }

    /// Classify and debounce a metric observed now.
    pub fn observe(&mut self, metric: &str, value: &MetricValue) -> Option<FeedbackSignal> {
        self.observe_at(metric, value, Instant::now())
    }

    /// Classify and debounce a metric observed at `now`.
    ///
    /// Returns the signal to show, or `None` if nothing should change.
    pub fn observe_at(
        &mut self,
        metric: &str,
        value: &MetricValue,
        now: Instant,
    ) -> Option<FeedbackSignal> {
        let signal = self.classify(metric, value);
        self.offer(signal, now)
    }

    /// Run an already classified signal through the debounce window.
    pub fn offer(&mut self, signal: FeedbackSignal, now: Instant) -> Option<FeedbackSignal> {
        if signal == FeedbackSignal::None {
            return None;
        }

        let emit = match self.last {
            None => true,
            Some((previous, at)) => {
                let within = now.saturating_duration_since(at) < self.min_interval;
                !within || (signal == FeedbackSignal::Shaky && previous != FeedbackSignal::Shaky)
            }
        };

        if emit {
            self.last = Some((signal, now));
            Some(signal)
        } else {
            trace!(?signal, "feedback suppressed by debounce");
            None
        }
    }

    /// Last emitted signal.
    pub fn current(&self) -> FeedbackSignal {
        self.last.map(|(s, _)| s).unwrap_or_default()
    }

    /// Forget the last emission, e.g. after a result was dismissed.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
