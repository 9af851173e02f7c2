//! Wellguard: crisis-risk text classifier
//!
//! Free text → RiskScorer → ScoreResult → AlertSink → AlertStore

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::{Result, WellguardError};

// =============================================================================
// TIER WEIGHTS - canonical 0-10 scale, contribution per matched phrase
// =============================================================================

pub const WEIGHT_CRITICAL: u8 = 10;
pub const WEIGHT_HIGH: u8 = 8;
pub const WEIGHT_MEDIUM: u8 = 5;
pub const WEIGHT_LOW: u8 = 3;
/// Sentiment weight of the positive band; it adds nothing to risk
pub const WEIGHT_POSITIVE: u8 = 1;

// =============================================================================
// LEVELS & BANDS
// =============================================================================

/// Risk levels are clamped to 0..=MAX_RISK_LEVEL
pub const MAX_RISK_LEVEL: u8 = 10;

/// Inclusive lower bounds of the suggestion bands
pub const BAND_CRISIS: u8 = 9;
pub const BAND_ELEVATED: u8 = 7;
pub const BAND_MODERATE: u8 = 5;
pub const BAND_MILD: u8 = 3;

// =============================================================================
// ALERTS
// =============================================================================

/// Compressed severity (1-5) at or above which an alert is raised.
/// Equivalent to risk level >= 5.
pub const ALERT_SEVERITY_THRESHOLD: u8 = 3;

/// Characters of the source text quoted in an alert description
pub const DESCRIPTION_QUOTE_CHARS: usize = 100;

/// Live preview only scores text longer than this many characters
pub const PREVIEW_MIN_CHARS: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
