// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notification channel from a provider's background work to the session
// controller. Events keep their arrival order.

use scanwerk_core::RecognitionEvent;
use tokio::sync::mpsc;
use tracing::trace;

/// Create a connected sink/stream pair.
pub fn event_channel() -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, EventStream { rx })
}

/// Sending half, owned by the provider.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<RecognitionEvent>,
}

impl EventSink {
    /// Deliver an event. Returns `false` once the controller is gone.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        trace!(kind = event.kind(), "provider event");
        self.tx.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the session controller.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<RecognitionEvent>,
}

impl EventStream {
    /// Next event already queued, without waiting.
    pub fn try_next(&mut self) -> Option<RecognitionEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event. `None` once every sink has been dropped.
    pub async fn next(&mut self) -> Option<RecognitionEvent> {
        self.rx.recv().await
    }

    /// Take everything queued so far, oldest first, without waiting.
    pub fn drain_pending(&mut self) -> Vec<RecognitionEvent> {
        let mut pending = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            pending.push(event);
        }
        pending
    }
}
