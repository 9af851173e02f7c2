//! Reason codes for scoring and alert decisions

use serde::{Deserialize, Serialize};

/// Why a submission ended the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Scoring
    // =========================================================================
    /// Text empty or blank
    R101_EMPTY_INPUT,
    /// No phrase matched
    R102_NO_KEYWORDS,
    /// Only positive phrases matched
    R103_POSITIVE_ONLY,

    // =========================================================================
    // R2xx: Alert threshold
    // =========================================================================
    /// Severity below the alert threshold
    R201_BELOW_THRESHOLD,

    // =========================================================================
    // R3xx: Delivery
    // =========================================================================
    /// Alert written to the store
    R301_ALERT_DELIVERED,
    /// Store failed after all retries, alert held in the outbox
    R302_ALERT_QUEUED,

    // =========================================================================
    // R4xx: Preview
    // =========================================================================
    /// Text too short to preview
    R401_PREVIEW_TOO_SHORT,
    /// Preview scored
    R402_PREVIEW_SCORED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_EMPTY_INPUT => "R101_EMPTY_INPUT",
            Self::R102_NO_KEYWORDS => "R102_NO_KEYWORDS",
            Self::R103_POSITIVE_ONLY => "R103_POSITIVE_ONLY",
            Self::R201_BELOW_THRESHOLD => "R201_BELOW_THRESHOLD",
            Self::R301_ALERT_DELIVERED => "R301_ALERT_DELIVERED",
            Self::R302_ALERT_QUEUED => "R302_ALERT_QUEUED",
            Self::R401_PREVIEW_TOO_SHORT => "R401_PREVIEW_TOO_SHORT",
            Self::R402_PREVIEW_SCORED => "R402_PREVIEW_SCORED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_EMPTY_INPUT => "Nothing to score",
            Self::R102_NO_KEYWORDS => "No risk or positive phrases found",
            Self::R103_POSITIVE_ONLY => "Only positive phrases found",
            Self::R201_BELOW_THRESHOLD => "Risk below alert threshold",
            Self::R301_ALERT_DELIVERED => "Crisis alert stored",
            Self::R302_ALERT_QUEUED => "Crisis alert queued for redelivery",
            Self::R401_PREVIEW_TOO_SHORT => "Keep typing",
            Self::R402_PREVIEW_SCORED => "Preview ready",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
