// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replay provider — feeds a recorded event script through the provider
// contract, one frame at a time, with a simulated camera that takes a while
// to release.
//
// Used by the `scanwerk` binary to replay captured sessions and by tests to
// observe how the controller drives a provider (see `ReplayProbe`).

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scanwerk_core::assets::verify_assets;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{RecognitionEvent, ScanConfig};
use tracing::{debug, info, warn};

use crate::channel::EventSink;
use crate::release::{ReleaseHandle, ReleaseNotifier};
use crate::traits::RecognitionProvider;

/// Counters and camera state recorded by a [`ReplayProvider`].
#[derive(Debug, Clone, Default)]
pub struct ProbeState {
    pub starts: u32,
    pub cancels: u32,
    pub releases_requested: u32,
    pub releases_completed: u32,
    pub camera_held: bool,
    pub release_pending: bool,
    /// Set if `start` was called while a release was still in flight.
    pub double_acquire: bool,
    /// Every scripted event has been emitted.
    pub exhausted: bool,
    pub last_config: Option<ScanConfig>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<ProbeState>,
    release_waiters: Mutex<Vec<ReleaseNotifier>>,
}

/// Read-only view into a [`ReplayProvider`] that outlives moving the provider
/// into a controller.
#[derive(Clone, Default)]
pub struct ReplayProbe {
    shared: Arc<Shared>,
}

impl ReplayProbe {
    pub fn snapshot(&self) -> ProbeState {
        self.shared
            .state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn update<R>(&self, f: impl FnOnce(&mut ProbeState) -> R) -> Option<R> {
        self.shared.state.lock().ok().map(|mut s| f(&mut s))
    }

    fn finish_release(&self) {
        self.update(|s| {
            s.camera_held = false;
            s.release_pending = false;
            s.releases_completed += 1;
        });
        let waiters = self
            .shared
            .release_waiters
            .lock()
            .map(|mut w| std::mem::take(&mut *w))
            .unwrap_or_default();
        for waiter in waiters {
            waiter.done();
        }
        debug!("replay camera released");
    }
}

/// Marks which streaming task is allowed to emit.
#[derive(Default)]
struct RunFlag {
    generation: AtomicU64,
    running: AtomicBool,
}

impl RunFlag {
    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.running.store(true, Ordering::SeqCst);
        generation
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.running.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Provider that replays a recorded list of [`RecognitionEvent`]s.
///
/// The script is consumed across runs: a cancelled run resumes where it
/// stopped on the next `start`, including frames handed back through
/// [`RecognitionProvider::requeue`].
pub struct ReplayProvider {
    script: Arc<Mutex<VecDeque<RecognitionEvent>>>,
    asset_root: PathBuf,
    frame_interval: Duration,
    release_delay: Duration,
    init_failure: Option<String>,
    sink: Option<EventSink>,
    run: Arc<RunFlag>,
    probe: ReplayProbe,
}

impl ReplayProvider {
    pub fn new(script: Vec<RecognitionEvent>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            asset_root: PathBuf::from("."),
            frame_interval: Duration::ZERO,
            release_delay: Duration::from_millis(20),
            init_failure: None,
            sink: None,
            run: Arc::new(RunFlag::default()),
            probe: ReplayProbe::default(),
        }
    }

    /// Load a script saved as a JSON array of events.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let script: Vec<RecognitionEvent> = serde_json::from_str(&raw)?;
        info!(
            path = %path.as_ref().display(),
            events = script.len(),
            "loaded replay script"
        );
        Ok(Self::new(script))
    }

    /// Directory trained-data assets are resolved against.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Delay between emitted frames. Zero yields to the runtime instead.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// How long the simulated camera takes to release.
    pub fn with_release_delay(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }

    /// Make every `start` fail, as an SDK with a bad license would.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.init_failure = Some(message.into());
        self
    }

    pub fn probe(&self) -> ReplayProbe {
        self.probe.clone()
    }

    fn spawn_stream(&self, runtime: &tokio::runtime::Handle, sink: EventSink) {
        let generation = self.run.begin();
        let run = Arc::clone(&self.run);
        let script = Arc::clone(&self.script);
        let probe = self.probe.clone();
        let frame_interval = self.frame_interval;

        runtime.spawn(async move {
            loop {
                match emit_next(&script, &run, generation, &sink) {
                    Frame::Emitted => {}
                    Frame::Stopped => break,
                    Frame::Exhausted => {
                        probe.update(|s| s.exhausted = true);
                        debug!("replay script exhausted");
                        break;
                    }
                }
                if frame_interval.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(frame_interval).await;
                }
            }
        });
    }

    /// Stop the current run. Holding the script lock guarantees no frame of
    /// the old run is emitted once this returns.
    fn halt(&self) {
        let _script = self.script.lock();
        self.run.stop();
    }
}

enum Frame {
    Emitted,
    Stopped,
    Exhausted,
}

/// Emit one scripted frame if `generation` is still the live run.
fn emit_next(
    script: &Mutex<VecDeque<RecognitionEvent>>,
    run: &RunFlag,
    generation: u64,
    sink: &EventSink,
) -> Frame {
    let Ok(mut script) = script.lock() else {
        return Frame::Stopped;
    };
    if !run.is_current(generation) {
        return Frame::Stopped;
    }
    let Some(event) = script.pop_front() else {
        return Frame::Exhausted;
    };
    if sink.emit(event.clone()) {
        Frame::Emitted
    } else {
        script.push_front(event);
        Frame::Stopped
    }
}

impl RecognitionProvider for ReplayProvider {
    fn name(&self) -> &str {
        "replay"
    }

    fn subscribe(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    fn start(&mut self, config: &ScanConfig) -> Result<()> {
        if let Some(message) = &self.init_failure {
            return Err(ScanError::Bridge(message.clone()));
        }
        verify_assets(&config.trained_data, &self.asset_root)?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ScanError::Bridge(format!("replay provider needs a tokio runtime: {e}")))?;
        let sink = self
            .sink
            .clone()
            .ok_or_else(|| ScanError::Bridge("no event sink subscribed".into()))?;

        let acquired = self.probe.update(|s| {
            if s.release_pending {
                s.double_acquire = true;
                return false;
            }
            s.camera_held = true;
            s.starts += 1;
            s.last_config = Some(config.clone());
            true
        });
        if acquired != Some(true) {
            warn!("replay camera requested while release is still pending");
            return Err(ScanError::ResourceBusy(
                "camera release still in progress".into(),
            ));
        }

        self.spawn_stream(&runtime, sink);
        Ok(())
    }

    fn cancel(&mut self) {
        self.halt();
        self.probe.update(|s| s.cancels += 1);
    }

    fn release_resource_async(&mut self) -> ReleaseHandle {
        self.halt();

        let held = self.probe.update(|s| s.camera_held).unwrap_or(false);
        if !held {
            return ReleaseHandle::completed();
        }

        let (notifier, handle) = ReleaseHandle::pending();
        if let Ok(mut waiters) = self.probe.shared.release_waiters.lock() {
            waiters.push(notifier);
        }
        let already_pending = self
            .probe
            .update(|s| {
                let was = s.release_pending;
                s.release_pending = true;
                s.releases_requested += 1;
                was
            })
            .unwrap_or(false);
        if already_pending {
            return handle;
        }

        let probe = self.probe.clone();
        let delay = self.release_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    probe.finish_release();
                });
            }
            Err(_) => probe.finish_release(),
        }
        handle
    }

    fn is_running(&self) -> bool {
        self.run.running.load(Ordering::SeqCst)
    }

    fn requeue(&mut self, events: Vec<RecognitionEvent>) {
        if events.is_empty() {
            return;
        }
        let count = events.len();
        if let Ok(mut script) = self.script.lock() {
            for event in events.into_iter().rev() {
                script.push_front(event);
            }
        }
        self.probe.update(|s| s.exhausted = false);
        debug!(count, "replay events returned to script");
    }
}
