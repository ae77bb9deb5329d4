// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Completion handle for asynchronous camera release.

use tokio::sync::oneshot;
use tracing::warn;

/// Signals that a release finished. Dropping it without calling
/// [`ReleaseNotifier::done`] also completes the handle.
#[derive(Debug)]
pub struct ReleaseNotifier {
    tx: oneshot::Sender<()>,
}

impl ReleaseNotifier {
    pub fn done(self) {
        // Receiver gone means nobody is waiting.
        let _ = self.tx.send(());
    }
}

/// Awaitable completion of a camera release.
///
/// [`ReleaseHandle::wait`] is cancel-safe: if the waiting future is dropped,
/// the handle keeps its receiver and can be awaited again.
#[derive(Debug)]
pub struct ReleaseHandle {
    rx: Option<oneshot::Receiver<()>>,
}

impl ReleaseHandle {
    /// A handle paired with the notifier that completes it.
    pub fn pending() -> (ReleaseNotifier, Self) {
        let (tx, rx) = oneshot::channel();
        (ReleaseNotifier { tx }, Self { rx: Some(rx) })
    }

    /// A handle for a resource that was released synchronously.
    pub fn completed() -> Self {
        Self { rx: None }
    }

    /// Whether the release has finished, without waiting.
    pub fn is_complete(&mut self) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return true;
        };
        match rx.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => false,
            Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                true
            }
        }
    }

    /// Wait until the release has finished.
    pub async fn wait(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return;
        };
        if rx.await.is_err() {
            warn!("release notifier dropped without completing; treating resource as free");
        }
        self.rx = None;
    }
}
