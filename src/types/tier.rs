//! Keyword tiers and risk categories

use serde::{Deserialize, Serialize};
use crate::{WEIGHT_CRITICAL, WEIGHT_HIGH, WEIGHT_MEDIUM, WEIGHT_LOW, WEIGHT_POSITIVE};

/// One severity band of the keyword taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    Critical,
    High,
    Medium,
    Low,
    /// Affirmative sentiment, not a risk band
    Positive,
}

impl KeywordTier {
    /// All tiers in scoring priority order, most severe first
    pub const ALL: [KeywordTier; 5] = [
        KeywordTier::Critical,
        KeywordTier::High,
        KeywordTier::Medium,
        KeywordTier::Low,
        KeywordTier::Positive,
    ];

    /// Weight per matched phrase on the 0-10 scale
    pub fn weight(&self) -> u8 {
        match self {
            KeywordTier::Critical => WEIGHT_CRITICAL,
            KeywordTier::High => WEIGHT_HIGH,
            KeywordTier::Medium => WEIGHT_MEDIUM,
            KeywordTier::Low => WEIGHT_LOW,
            KeywordTier::Positive => WEIGHT_POSITIVE,
        }
    }

    /// Weight on the compressed 1-5 alert scale
    pub fn severity(&self) -> u8 {
        match self {
            KeywordTier::Critical => 5,
            KeywordTier::High => 4,
            KeywordTier::Medium => 3,
            KeywordTier::Low => 2,
            KeywordTier::Positive => 1,
        }
    }

    /// Whether matches add to the risk total
    pub fn is_risk(&self) -> bool {
        !matches!(self, KeywordTier::Positive)
    }

    /// Contribution of one matched phrase to the risk total
    pub fn risk_contribution(&self) -> u32 {
        if self.is_risk() {
            self.weight() as u32
        } else {
            0
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeywordTier::Critical => "critical",
            KeywordTier::High => "high",
            KeywordTier::Medium => "medium",
            KeywordTier::Low => "low",
            KeywordTier::Positive => "positive",
        }
    }
}

impl std::fmt::Display for KeywordTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Category of a scored text: the dominant matched tier, or `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Critical,
    High,
    Medium,
    Low,
    Positive,
    /// Empty text or no phrase matched
    None,
}

impl RiskCategory {
    pub fn name(&self) -> &'static str {
        match self {
            RiskCategory::Critical => "critical",
            RiskCategory::High => "high",
            RiskCategory::Medium => "medium",
            RiskCategory::Low => "low",
            RiskCategory::Positive => "positive",
            RiskCategory::None => "none",
        }
    }
}

impl From<KeywordTier> for RiskCategory {
    fn from(tier: KeywordTier) -> Self {
        match tier {
            KeywordTier::Critical => RiskCategory::Critical,
            KeywordTier::High => RiskCategory::High,
            KeywordTier::Medium => RiskCategory::Medium,
            KeywordTier::Low => RiskCategory::Low,
            KeywordTier::Positive => RiskCategory::Positive,
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_descend_in_priority_order() {
        let weights: Vec<u8> = KeywordTier::ALL.iter().map(|t| t.weight()).collect();
        assert!(weights.windows(2).all(|w| w[0] > w[1]), "weights: {:?}", weights);
    }

    #[test]
    fn test_positive_adds_no_risk() {
        assert_eq!(KeywordTier::Positive.risk_contribution(), 0);
        assert_eq!(KeywordTier::Low.risk_contribution(), 3);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&RiskCategory::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
