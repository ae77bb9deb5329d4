// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use std::sync::Arc;

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// Expected per-frame outcomes (no text, low confidence, failed validation)
/// are not errors; they travel as [`crate::NoResultReason`].
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Lifecycle --
    #[error("scan session is already running")]
    AlreadyRunning,

    #[error("scan session has been torn down")]
    Terminated,

    // -- Provider initialisation (fatal) --
    /// The provider's `start` failed; `source` is what it returned.
    #[error("recognition provider failed to initialise: {source}")]
    Init { source: Arc<ScanError> },

    /// A later `start` after [`ScanError::Init`], carrying the same cause.
    #[error("recognition provider failed to initialise earlier: {source}")]
    InitFailed { source: Arc<ScanError> },

    #[error("camera resource is busy: {0}")]
    ResourceBusy(String),

    // -- Configuration / assets --
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    #[error("trained-data asset not found: {0}")]
    AssetMissing(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Platform bridge --
    #[error("recognition provider error: {0}")]
    Bridge(String),

    #[error("no recognition provider available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether the caller can safely log and carry on.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::AlreadyRunning)
    }

    /// Whether this error ends the session's ability to scan.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Init { .. }
                | Self::InitFailed { .. }
                | Self::AssetMissing(_)
                | Self::IntegrityMismatch { .. }
                | Self::PlatformUnavailable
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    fn init(cause: ScanError) -> ScanError {
        ScanError::Init {
            source: Arc::new(cause),
        }
    }

    #[test]
    fn only_already_running_is_ignorable() {
        assert!(ScanError::AlreadyRunning.is_ignorable());
        assert!(!ScanError::Terminated.is_ignorable());
        assert!(!init(ScanError::Bridge("bad license".into())).is_ignorable());
    }

    #[test]
    fn init_failures_are_fatal() {
        assert!(init(ScanError::ResourceBusy("camera".into())).is_fatal());
        assert!(ScanError::PlatformUnavailable.is_fatal());
        assert!(!ScanError::AlreadyRunning.is_fatal());
        assert!(!ScanError::ResourceBusy("camera".into()).is_fatal());
    }

    #[test]
    fn init_error_exposes_its_cause() {
        let err = init(ScanError::PlatformUnavailable);
        assert_eq!(
            err.to_string(),
            "recognition provider failed to initialise: no recognition provider available on this platform"
        );
        let cause = err.source().map(|s| s.to_string());
        assert_eq!(cause, Some(ScanError::PlatformUnavailable.to_string()));
    }
}
