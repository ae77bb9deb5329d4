// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mutable scan session record, owned by the controller.

use chrono::{DateTime, Utc};
use scanwerk_core::{FeedbackSignal, ScanResult, ScanState, SessionId};

/// State of one scan session. Only the controller mutates it.
#[derive(Debug, Clone)]
pub struct ScanSession {
    pub id: SessionId,
    pub state: ScanState,
    pub last_feedback: FeedbackSignal,
    pub last_result: Option<ScanResult>,
    pub created_at: DateTime<Utc>,
    /// When the provider last started successfully.
    pub started_at: Option<DateTime<Utc>>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            state: ScanState::Idle,
            last_feedback: FeedbackSignal::None,
            last_result: None,
            created_at: Utc::now(),
            started_at: None,
        }
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}
