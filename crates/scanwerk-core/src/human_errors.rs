// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the dialog a host shows when scanning
// cannot proceed.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing to show; the operation was a harmless repeat.
    Silent,
    /// Something temporary — trying again is likely to work.
    Transient,
    /// User must do something (close another camera app, fix a setting).
    ActionRequired,
    /// Scanning is unavailable until the app is reinstalled or reconfigured.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same operation may succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError` suitable for a dialog.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::AlreadyRunning => HumanError {
            message: "Scanning is already running.".into(),
            suggestion: "Point the camera at the text.".into(),
            retriable: false,
            severity: Severity::Silent,
        },

        ScanError::Terminated => HumanError {
            message: "This scanner has been closed.".into(),
            suggestion: "Open the scanner again to continue.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Init { source } | ScanError::InitFailed { source } => match source.as_ref() {
            // SDKs only report start-up failures as text.
            ScanError::Bridge(detail) => humanize_init_error(detail),
            cause => humanize_error(cause),
        },

        ScanError::ResourceBusy(_) => HumanError {
            message: "The camera is busy.".into(),
            suggestion: "Close other apps that use the camera, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner is set up incorrectly.".into(),
            suggestion: format!("Check the scan settings. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::AssetMissing(_) | ScanError::IntegrityMismatch { .. } => HumanError {
            message: "Some files the scanner needs are missing or damaged.".into(),
            suggestion: "Reinstall the app to restore the language files.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::PlatformUnavailable => HumanError {
            message: "Text scanning isn't available on this device.".into(),
            suggestion: "Use a phone or tablet with a camera.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Bridge(detail) => HumanError {
            message: "The scanner had a problem.".into(),
            suggestion: format!("Close the scanner and open it again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Io(_) | ScanError::Serialization(_) => HumanError {
            message: "The scanner couldn't read its settings.".into(),
            suggestion: "Check that the settings file exists and is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Map an SDK's start-up failure by its detail text.
fn humanize_init_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("license") || lower.contains("licence") {
        return HumanError {
            message: "The scanner's license is not valid.".into(),
            suggestion: "Update the app, or contact its developer if this keeps happening."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        };
    }

    if lower.contains("permission") || lower.contains("camera") {
        return HumanError {
            message: "We can't open the camera.".into(),
            suggestion: "Allow camera access in the system settings, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        };
    }

    if lower.contains("traineddata") || lower.contains("asset") || lower.contains("integrity") {
        return HumanError {
            message: "Some files the scanner needs are missing or damaged.".into(),
            suggestion: "Reinstall the app to restore the language files.".into(),
            retriable: false,
            severity: Severity::Permanent,
        };
    }

    HumanError {
        message: "The scanner couldn't start.".into(),
        suggestion: format!("Close the scanner and open it again. ({detail})"),
        retriable: false,
        severity: Severity::Permanent,
    }
}
