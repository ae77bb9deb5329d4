// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk scan-session coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metric name reported by providers for the cutout's centre brightness.
pub const BRIGHTNESS_METRIC: &str = "$brightness";
/// Metric name reported by providers when the device is moving too much.
pub const SHAKE_WARNING_METRIC: &str = "$deviceShakeWarning";
/// Metric name for the per-frame confidence (0–100).
pub const CONFIDENCE_METRIC: &str = "$confidence";
/// Metric name for the detected sharpness (only when min sharpness > 0).
pub const SHARPNESS_METRIC: &str = "$sharpness";

/// Unique identifier for a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    /// Created, provider never started.
    Idle,
    /// Provider is running and events are processed.
    Scanning,
    /// Host went to the background; camera released.
    Paused,
    /// A valid result is on screen; provider stopped until dismissed.
    ResultDisplayed,
    /// Torn down. No further transitions.
    Terminated,
}

impl ScanState {
    /// Whether `start()` may move this state to `Scanning`.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Paused | Self::ResultDisplayed)
    }
}

/// A value attached to a provider report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(n) => Some(*n),
            Self::Flag(_) | Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A point of a detected text outline, in preview coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlinePoint {
    pub x: f32,
    pub y: f32,
}

/// Why the provider gave up on a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    NoLinesFound,
    NoTextFound,
    ConfidenceNotReached,
    ResultNotValid,
    SharpnessNotReached,
    Other(String),
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLinesFound => f.write_str("no lines found"),
            Self::NoTextFound => f.write_str("no text found"),
            Self::ConfidenceNotReached => f.write_str("confidence not reached"),
            Self::ResultNotValid => f.write_str("result not valid"),
            Self::SharpnessNotReached => f.write_str("sharpness not reached"),
            Self::Other(detail) => f.write_str(detail),
        }
    }
}

/// Events emitted by a recognition provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// Telemetry value that arose during processing (brightness, sharpness, ...).
    Report { key: String, value: MetricValue },
    /// Outline of a possible text region.
    OutlineDetected { points: Vec<OutlinePoint> },
    /// Recognized text with its confidence (0–100).
    Result { text: String, confidence: u8 },
    /// No result for the current frame; the provider continues on the next one.
    Aborted { reason: AbortReason, message: String },
}

impl RecognitionEvent {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Report { .. } => "report",
            Self::OutlineDetected { .. } => "outline",
            Self::Result { .. } => "result",
            Self::Aborted { .. } => "aborted",
        }
    }
}

/// User-facing capture feedback derived from provider metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedbackSignal {
    TooBright,
    TooDark,
    Ok,
    Shaky,
    #[default]
    None,
}

impl FeedbackSignal {
    /// Brightness-derived signals yield to `Shaky` inside the debounce window.
    pub fn is_brightness(&self) -> bool {
        matches!(self, Self::TooBright | Self::TooDark | Self::Ok)
    }

    /// Hint text for an on-screen feedback view.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TooBright => Some("Too bright. Move away from direct light."),
            Self::TooDark => Some("Too dark. Find more light."),
            Self::Ok => Some("Hold still."),
            Self::Shaky => Some("Device is shaking. Hold steady."),
            Self::None => None,
        }
    }
}

/// Why a frame produced no accepted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoResultReason {
    /// The provider aborted the run itself.
    Aborted { reason: AbortReason, message: String },
    /// A result arrived but below the configured minimum confidence.
    LowConfidence { confidence: u8, required: u8 },
    /// A result arrived but failed whitelist or pattern validation.
    ValidationFailed { text: String },
}

impl std::fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aborted { reason, message } if message.is_empty() => write!(f, "{reason}"),
            Self::Aborted { reason, message } => write!(f, "{reason}: {message}"),
            Self::LowConfidence {
                confidence,
                required,
            } => write!(f, "confidence {confidence} below {required}"),
            Self::ValidationFailed { text } => write!(f, "\"{text}\" failed validation"),
        }
    }
}

/// An accepted recognition result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub text: String,
    pub confidence: u8,
    pub captured_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(text: String, confidence: u8) -> Self {
        Self {
            text,
            confidence,
            captured_at: Utc::now(),
        }
    }
}
