// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Scanwerk — Recognition provider bridge.
//!
//! Defines the capability traits a camera OCR SDK binding implements
//! ([`RecognitionProvider`]) and the callbacks the UI layer implements
//! ([`ScanObserver`]), together with the notification channel that carries
//! [`scanwerk_core::RecognitionEvent`]s from the provider's background work to
//! the session controller.
//!
//! Only SDK-free providers ship here: [`stub::StubProvider`] for hosts with no
//! recognition engine and [`replay::ReplayProvider`] for recorded sessions.

pub mod channel;
pub mod release;
pub mod replay;
pub mod stub;
pub mod traits;

pub use channel::{EventSink, EventStream, event_channel};
pub use release::{ReleaseHandle, ReleaseNotifier};
pub use replay::{ReplayProbe, ReplayProvider};
pub use stub::StubProvider;
pub use traits::{RecognitionProvider, ScanObserver};

/// Provider used when the host has not bound a recognition SDK.
///
/// Hosts with an SDK construct their own provider and hand it to the session
/// controller directly.
pub fn default_provider() -> Box<dyn RecognitionProvider> {
    Box::new(StubProvider)
}
