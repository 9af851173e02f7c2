//! Alert sink: turns a qualifying score into a crisis alert record
//!
//! The sink only builds the record. Persisting it is the caller's job
//! (see `core::delivery`).

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::{AlertId, AlertStatus, AlertType, CrisisAlert, ScoreResult};
use crate::{ALERT_SEVERITY_THRESHOLD, DESCRIPTION_QUOTE_CHARS};

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Builds crisis alerts for scores at or above a severity threshold
#[derive(Debug, Clone, Copy)]
pub struct AlertSink {
    /// Compressed 1-5 severity that raises an alert
    threshold: u8,
}

impl Default for AlertSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink {
    /// Sink with the standard threshold (severity 3, risk level 5)
    pub fn new() -> Self {
        Self {
            threshold: ALERT_SEVERITY_THRESHOLD,
        }
    }

    /// Sink with a custom severity threshold, clamped to 1-5
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold: threshold.clamp(1, 5),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Whether a result qualifies for an alert
    pub fn should_alert(&self, result: &ScoreResult) -> bool {
        !result.is_clear() && result.severity() >= self.threshold
    }

    /// Whether the UI should open its crisis response flow. Same scale and
    /// threshold as persisted alerts.
    pub fn crisis_flow(&self, result: &ScoreResult) -> bool {
        self.should_alert(result)
    }

    /// Build an alert for `result`, or `None` below threshold
    pub fn to_alert(&self, result: &ScoreResult, subject_id: &str, raw_text: &str) -> Option<CrisisAlert> {
        self.to_alert_at(result, subject_id, raw_text, Utc::now())
    }

    /// Same as `to_alert` with an explicit submission time
    pub fn to_alert_at(
        &self,
        result: &ScoreResult,
        subject_id: &str,
        raw_text: &str,
        submitted_at: DateTime<Utc>,
    ) -> Option<CrisisAlert> {
        if !self.should_alert(result) {
            return None;
        }

        let id = AlertId::new();
        Some(CrisisAlert {
            id,
            subject_id: subject_id.to_string(),
            alert_type: AlertType::from(result.category),
            severity_level: result.severity(),
            risk_level: result.level,
            description: describe(raw_text, &result.matched_keywords),
            matched_keywords: result.matched_keywords.clone(),
            status: AlertStatus::Pending,
            created_at: submitted_at,
            updated_at: submitted_at,
            idempotency_key: idempotency_key(id, subject_id, raw_text, submitted_at),
        })
    }
}

/// Quote of the first characters of the text plus the matched keywords
pub fn describe(raw_text: &str, matched_keywords: &[String]) -> String {
    let collapsed = RE_WHITESPACE.replace_all(raw_text.trim(), " ");
    let mut quote: String = collapsed.chars().take(DESCRIPTION_QUOTE_CHARS).collect();
    if collapsed.chars().count() > DESCRIPTION_QUOTE_CHARS {
        quote.push_str("...");
    }

    format!("\"{}\" | keywords: {}", quote, matched_keywords.join(", "))
}

/// Hex SHA-256 over alert id, subject, text and submission time.
/// Retries resend the same alert and so the same key.
fn idempotency_key(id: AlertId, subject_id: &str, raw_text: &str, submitted_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(subject_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(raw_text.as_bytes());
    hasher.update([0u8]);
    hasher.update(submitted_at.to_rfc3339().as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

// =============================================================================
// TESTS
// =============================================================================
