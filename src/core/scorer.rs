//! Risk scorer: keyword-weighted crisis risk on a 0-10 scale
//!
//! Every phrase of every tier is tested against the lower-cased text.
//! Matches add their tier weight to a running total which is clamped to
//! 0-10 at the end, so several small matches can saturate just like one
//! critical match. The category is the heaviest tier that matched.

use std::sync::Arc;

use crate::core::suggestions::suggestions_for;
use crate::core::taxonomy::Taxonomy;
use crate::types::{KeywordTier, RiskCategory, ScoreResult};
use crate::MAX_RISK_LEVEL;

/// Crisis-risk scorer over a shared taxonomy
#[derive(Debug, Clone)]
pub struct RiskScorer {
    taxonomy: Arc<Taxonomy>,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer {
    /// Create scorer over the built-in taxonomy
    pub fn new() -> Self {
        Self {
            taxonomy: Taxonomy::builtin(),
        }
    }

    /// Create scorer over a custom taxonomy
    pub fn with_taxonomy(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Score text and return level, category, matches and suggestions
    pub fn score(&self, text: &str) -> ScoreResult {
        if text.trim().is_empty() {
            return ScoreResult {
                level: 0,
                category: RiskCategory::None,
                matched_keywords: Vec::new(),
                suggestions: suggestions_for(0),
            };
        }

        let lowered = text.to_lowercase();

        let mut total: u32 = 0;
        let mut matched_keywords = Vec::new();
        let mut dominant: Option<KeywordTier> = None;

        for tier in self.taxonomy.tiers() {
            for phrase in &tier.keywords {
                if !lowered.contains(phrase.as_str()) {
                    continue;
                }
                total = total.saturating_add(tier.tier.risk_contribution());
                matched_keywords.push(phrase.clone());

                // Strictly heavier only: on a tie the earlier tier stays
                if dominant.map_or(true, |d| tier.tier.weight() > d.weight()) {
                    dominant = Some(tier.tier);
                }
            }
        }

        let level = total.min(MAX_RISK_LEVEL as u32) as u8;
        let category = dominant.map_or(RiskCategory::None, RiskCategory::from);

        tracing::debug!(
            level,
            category = category.name(),
            matches = matched_keywords.len(),
            "scored text"
        );

        ScoreResult {
            level,
            category,
            matched_keywords,
            suggestions: suggestions_for(level),
        }
    }

    /// Quick score - just return the level
    pub fn quick_score(&self, text: &str) -> u8 {
        self.score(text).level
    }
}

// =============================================================================
// TESTS
// =============================================================================
