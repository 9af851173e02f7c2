//! Scoring output

use serde::{Deserialize, Serialize};
use crate::types::{RiskBand, RiskCategory};

/// Result of scoring one text, produced fresh per call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Risk level: 0-10
    pub level: u8,
    /// Dominant matched tier
    pub category: RiskCategory,
    /// Phrases found, in tier priority order then taxonomy order
    pub matched_keywords: Vec<String>,
    /// Suggestions for the level's band
    pub suggestions: Vec<String>,
}

impl ScoreResult {
    /// Band the level falls into
    pub fn band(&self) -> RiskBand {
        RiskBand::from_level(self.level)
    }

    /// Level on the compressed 1-5 alert scale
    pub fn severity(&self) -> u8 {
        compressed_severity(self.level)
    }

    /// No phrase matched
    pub fn is_clear(&self) -> bool {
        self.matched_keywords.is_empty()
    }
}

/// Map a 0-10 level onto the 1-5 severity scale: `max(1, ceil(level / 2))`
pub fn compressed_severity(level: u8) -> u8 {
    level.div_ceil(2).clamp(1, 5)
}
