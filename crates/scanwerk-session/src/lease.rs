// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera lease bookkeeping.
//
// A lease exists from the first successful provider start until the release
// has been requested. The controller never starts the provider while the
// previous lease's release is still in flight.

use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Proof that the session holds the provider's camera.
#[derive(Debug)]
pub struct CameraLease {
    provider: String,
    acquired_at: Instant,
}

impl CameraLease {
    pub fn acquire(provider: &str) -> Self {
        info!(provider, "camera acquired");
        Self {
            provider: provider.to_owned(),
            acquired_at: Instant::now(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Consume the lease once release has been requested.
    pub fn surrender(self) {
        debug!(
            provider = %self.provider,
            held_ms = self.held_for().as_millis() as u64,
            "camera release requested"
        );
    }
}
