// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-session — Scan session coordination for Scanwerk.
//
// Provides the session state machine (start, pause, result display, teardown)
// around an opaque recognition provider, the result policy (confidence,
// whitelist, full-string pattern), and debounced capture feedback.

pub mod controller;
pub mod feedback;
pub mod lease;
pub mod observer;
pub mod policy;
pub mod session;

pub use controller::{EventOutcome, ScanSessionController};
pub use feedback::FeedbackClassifier;
pub use observer::{ChannelObserver, SessionEvent};
pub use policy::{ResultPolicy, Verdict};
pub use session::ScanSession;
