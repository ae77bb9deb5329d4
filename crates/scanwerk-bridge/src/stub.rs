// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub provider for hosts where no recognition SDK is bound.
//
// `start` always fails with `PlatformUnavailable`, which the session
// controller surfaces as a one-time init error.

use scanwerk_core::ScanConfig;
use scanwerk_core::error::{Result, ScanError};

use crate::channel::EventSink;
use crate::release::ReleaseHandle;
use crate::traits::RecognitionProvider;

/// No-op provider returned by [`crate::default_provider`].
pub struct StubProvider;

impl RecognitionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn subscribe(&mut self, _sink: EventSink) {}

    fn start(&mut self, _config: &ScanConfig) -> Result<()> {
        tracing::warn!("RecognitionProvider::start called on stub provider");
        Err(ScanError::PlatformUnavailable)
    }

    fn cancel(&mut self) {}

    fn release_resource_async(&mut self) -> ReleaseHandle {
        ReleaseHandle::completed()
    }

    fn is_running(&self) -> bool {
        false
    }
}
