// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the recognition provider and the
// UI observer.

use scanwerk_core::error::Result;
use scanwerk_core::{
    FeedbackSignal, MetricValue, NoResultReason, OutlinePoint, RecognitionEvent, ScanConfig,
};

use crate::channel::EventSink;
use crate::release::ReleaseHandle;

/// Opaque camera OCR engine.
///
/// Implementations run their own background work and deliver
/// [`scanwerk_core::RecognitionEvent`]s through the sink registered with
/// [`RecognitionProvider::subscribe`].
pub trait RecognitionProvider: Send {
    /// Human-readable provider name (e.g. "replay", "stub").
    fn name(&self) -> &str;

    /// Register the notification channel events are delivered on.
    /// A later call replaces the earlier sink.
    fn subscribe(&mut self, sink: EventSink);

    /// Acquire the camera if needed and begin emitting events.
    ///
    /// Fails when the provider cannot initialise (invalid license, missing
    /// trained data, no camera). Such failures are not retried.
    fn start(&mut self, config: &ScanConfig) -> Result<()>;

    /// Stop processing frames. The camera stays acquired.
    fn cancel(&mut self);

    /// Begin releasing the camera. The handle completes once it is free.
    fn release_resource_async(&mut self) -> ReleaseHandle;

    /// Whether frames are currently being processed.
    fn is_running(&self) -> bool;

    /// Hand back events that were delivered after `cancel` and never
    /// processed, oldest first. Only called while stopped.
    ///
    /// A live camera has nothing to redo, so the default drops them.
    fn requeue(&mut self, _events: Vec<RecognitionEvent>) {}
}

impl<P: RecognitionProvider + ?Sized> RecognitionProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn subscribe(&mut self, sink: EventSink) {
        (**self).subscribe(sink)
    }

    fn start(&mut self, config: &ScanConfig) -> Result<()> {
        (**self).start(config)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn release_resource_async(&mut self) -> ReleaseHandle {
        (**self).release_resource_async()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn requeue(&mut self, events: Vec<RecognitionEvent>) {
        (**self).requeue(events)
    }
}

/// Callbacks the UI layer receives from a scan session.
pub trait ScanObserver: Send {
    /// A result passed the confidence and validation policy.
    fn on_valid_result(&mut self, text: &str, confidence: u8);

    /// A frame produced nothing usable; scanning continues.
    fn on_no_result(&mut self, reason: &NoResultReason);

    /// Raw provider telemetry, forwarded verbatim.
    fn on_report(&mut self, key: &str, value: &MetricValue);

    /// Outline of a possible text region.
    ///
    /// Return `true` if the observer draws it; `false` lets the host draw it
    /// automatically.
    fn on_outline_detected(&mut self, points: &[OutlinePoint]) -> bool;

    /// The provider could not start. Called at most once per session.
    fn on_init_error(&mut self, message: &str);

    /// Debounced capture feedback.
    fn on_feedback(&mut self, _signal: FeedbackSignal) {}
}
