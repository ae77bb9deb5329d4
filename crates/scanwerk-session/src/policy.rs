// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result policy — decides whether recognized text counts as a valid result.
//
// Confidence is checked first, then the validation pattern, which must match
// the whole (normalized) text. The character whitelist only restricts what the
// recognizer reads and is not re-checked here.

use regex::Regex;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{NoResultReason, ScanConfig};

/// Outcome of evaluating one recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Accepted, carrying the normalized text.
    Accept(String),
    Reject(NoResultReason),
}

/// Compiled form of the policy fields of a [`ScanConfig`].
#[derive(Debug, Clone)]
pub struct ResultPolicy {
    min_confidence: u8,
    pattern: Option<Regex>,
    remove_whitespaces: bool,
}

impl ResultPolicy {
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let pattern = config
            .validation_regex
            .as_deref()
            .map(|p| {
                Regex::new(&format!("^(?:{p})$")).map_err(|e| {
                    ScanError::InvalidConfig(format!("validation_regex does not compile: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            min_confidence: config.min_confidence,
            pattern,
            remove_whitespaces: config.remove_whitespaces,
        })
    }

    pub fn min_confidence(&self) -> u8 {
        self.min_confidence
    }

    /// Apply the configured text normalization.
    pub fn normalize(&self, text: &str) -> String {
        if self.remove_whitespaces {
            text.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            text.to_owned()
        }
    }

    pub fn evaluate(&self, text: &str, confidence: u8) -> Verdict {
        if confidence < self.min_confidence {
            return Verdict::Reject(NoResultReason::LowConfidence {
                confidence,
                required: self.min_confidence,
            });
        }

        let text = self.normalize(text);

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&text) {
                return Verdict::Reject(NoResultReason::ValidationFailed { text });
            }
        }

        Verdict::Accept(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IBAN: &str = "DE89370400440532013000";

    fn iban_policy() -> ResultPolicy {
        ResultPolicy::from_config(&ScanConfig::iban()).unwrap()
    }

    #[test]
    fn accepts_valid_iban() {
        assert_eq!(iban_policy().evaluate(IBAN, 70), Verdict::Accept(IBAN.into()));
        assert_eq!(iban_policy().evaluate(IBAN, 65), Verdict::Accept(IBAN.into()));
    }

    #[test]
    fn rejects_low_confidence_before_validation() {
        assert_eq!(
            iban_policy().evaluate("garbage", 64),
            Verdict::Reject(NoResultReason::LowConfidence {
                confidence: 64,
                required: 65
            })
        );
    }

    #[test]
    fn whitespace_is_removed_before_matching() {
        assert_eq!(
            iban_policy().evaluate("DE89 3704 0044 0532 0130 00", 90),
            Verdict::Accept(IBAN.into())
        );
    }

    #[test]
    fn whitelist_is_left_to_the_recognizer() {
        let config = ScanConfig {
            min_confidence: 65,
            char_whitelist: Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".into()),
            validation_regex: Some("^[A-Za-z]{2}[0-9]+$".into()),
            ..ScanConfig::default()
        };
        let policy = ResultPolicy::from_config(&config).unwrap();
        assert_eq!(policy.evaluate("de1234", 90), Verdict::Accept("de1234".into()));
    }

    #[test]
    fn pattern_must_match_whole_text() {
        let config = ScanConfig {
            validation_regex: Some("[A-Z]{2}[0-9]+".into()),
            ..ScanConfig::default()
        };
        let policy = ResultPolicy::from_config(&config).unwrap();
        assert!(matches!(policy.evaluate("DE123", 0), Verdict::Accept(_)));
        assert!(matches!(
            policy.evaluate("xxDE123yy", 0),
            Verdict::Reject(NoResultReason::ValidationFailed { .. })
        ));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let config = ScanConfig {
            validation_regex: Some("AB|CD".into()),
            ..ScanConfig::default()
        };
        let policy = ResultPolicy::from_config(&config).unwrap();
        assert!(matches!(policy.evaluate("CD", 0), Verdict::Accept(_)));
        assert!(matches!(policy.evaluate("ABCD", 0), Verdict::Reject(_)));
    }

    #[test]
    fn no_pattern_accepts_anything_confident() {
        let policy = ResultPolicy::from_config(&ScanConfig::shipping_container()).unwrap();
        assert_eq!(
            policy.evaluate("MSKU 123456 7", 1),
            Verdict::Accept("MSKU 123456 7".into())
        );
    }
}
