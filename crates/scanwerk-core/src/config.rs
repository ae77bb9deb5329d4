// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration: recognition parameters handed to the provider, plus the
// result policy and feedback tuning applied by the session controller.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::TrainedDataAsset;
use crate::error::{Result, ScanError};

/// How the provider looks for text inside the cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanMode {
    /// A single line; length and font may vary.
    #[default]
    Line,
    /// Fixed grid of characters.
    Grid,
    /// Provider decides, driven by its command file.
    Auto,
}

/// Camera focus mode requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FocusMode {
    #[default]
    Auto,
    ContinuousPicture,
    ContinuousVideo,
    Macro,
    Fixed,
}

/// Focus behaviour for the camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub default_mode: FocusMode,
    /// Interval between automatic focus passes, in milliseconds.
    pub auto_focus_interval_ms: u64,
    pub focus_on_touch: bool,
    /// Phase detection auto-focus on devices that support it.
    pub phase_auto_focus: bool,
    /// Restrict focus metering to the cutout.
    pub focus_areas: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            default_mode: FocusMode::Auto,
            auto_focus_interval_ms: 8_000,
            focus_on_touch: true,
            phase_auto_focus: true,
            focus_areas: true,
        }
    }
}

/// Thresholds and debounce interval for capture feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Brightness below this is reported as too dark.
    pub too_dark_below: f64,
    /// Brightness above this is reported as too bright.
    pub too_bright_above: f64,
    /// Minimum time between two emitted signals, in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            too_dark_below: 60.0,
            too_bright_above: 200.0,
            min_interval_ms: 500,
        }
    }
}

impl FeedbackConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Immutable description of one scan use case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Language packs the provider loads (trained-data names).
    pub languages: Vec<String>,
    /// Characters the recognizer may produce. `None` allows everything.
    pub char_whitelist: Option<String>,
    /// Text height range inside the cutout, in pixels.
    pub min_char_height: u32,
    pub max_char_height: u32,
    /// Minimum confidence (0–100) for a result to count.
    pub min_confidence: u8,
    /// Minimum sharpness (0–100); 0 disables sharpness detection.
    pub min_sharpness: u8,
    /// Full-string pattern an accepted result must match.
    pub validation_regex: Option<String>,
    pub remove_whitespaces: bool,
    pub remove_small_contours: bool,
    pub scan_mode: ScanMode,
    /// Provider command script used in [`ScanMode::Auto`].
    pub custom_cmd_file: Option<String>,
    /// Assets that must be present and intact before the provider starts.
    pub trained_data: Vec<TrainedDataAsset>,
    pub focus: FocusConfig,
    pub use_max_fps_range: bool,
    pub scene_mode: Option<String>,
    /// Whether the provider may upload scan reports to its vendor.
    pub reporting_enabled: bool,
    pub feedback: FeedbackConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            char_whitelist: None,
            min_char_height: 0,
            max_char_height: u32::MAX,
            min_confidence: 0,
            min_sharpness: 0,
            validation_regex: None,
            remove_whitespaces: false,
            remove_small_contours: false,
            scan_mode: ScanMode::Line,
            custom_cmd_file: None,
            trained_data: Vec::new(),
            focus: FocusConfig::default(),
            use_max_fps_range: false,
            scene_mode: None,
            reporting_enabled: true,
            feedback: FeedbackConfig::default(),
        }
    }
}

impl ScanConfig {
    /// IBAN scanning: capitals and digits on a single line, country prefix
    /// validated by pattern.
    pub fn iban() -> Self {
        Self {
            languages: vec!["eng_no_dict".into(), "deu".into()],
            char_whitelist: Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890".into()),
            min_char_height: 20,
            max_char_height: 60,
            min_confidence: 65,
            min_sharpness: 66,
            validation_regex: Some(r"^[A-Z]{2}([0-9A-Z]\s*){13,32}$".into()),
            remove_whitespaces: true,
            remove_small_contours: true,
            scan_mode: ScanMode::Line,
            use_max_fps_range: true,
            scene_mode: Some("sports".into()),
            ..Self::default()
        }
    }

    /// Shipping container numbers, located by the provider's own command file.
    pub fn shipping_container() -> Self {
        Self {
            languages: vec!["USNr.any".into()],
            scan_mode: ScanMode::Auto,
            custom_cmd_file: Some("container_scanner.ale".into()),
            ..Self::default()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "iban" => Some(Self::iban()),
            "container" | "shipping-container" | "shipping_container" => {
                Some(Self::shipping_container())
            }
            _ => None,
        }
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the value invariants.
    pub fn validate(&self) -> Result<()> {
        if self.min_confidence > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "min_confidence must be within 0..=100, got {}",
                self.min_confidence
            )));
        }
        if self.min_sharpness > 100 {
            return Err(ScanError::InvalidConfig(format!(
                "min_sharpness must be within 0..=100, got {}",
                self.min_sharpness
            )));
        }
        if self.min_char_height > self.max_char_height {
            return Err(ScanError::InvalidConfig(format!(
                "min_char_height ({}) exceeds max_char_height ({})",
                self.min_char_height, self.max_char_height
            )));
        }
        if matches!(&self.char_whitelist, Some(w) if w.is_empty()) {
            return Err(ScanError::InvalidConfig(
                "char_whitelist must not be empty when set".into(),
            ));
        }
        if let Some(pattern) = &self.validation_regex {
            regex::Regex::new(pattern).map_err(|e| {
                ScanError::InvalidConfig(format!("validation_regex does not compile: {e}"))
            })?;
        }
        if self.feedback.too_dark_below > self.feedback.too_bright_above {
            return Err(ScanError::InvalidConfig(format!(
                "feedback too_dark_below ({}) exceeds too_bright_above ({})",
                self.feedback.too_dark_below, self.feedback.too_bright_above
            )));
        }
        Ok(())
    }
}
