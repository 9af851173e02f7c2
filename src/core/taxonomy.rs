//! Keyword taxonomy: phrases per severity tier
//!
//! Matching is plain substring containment on lower-cased text, so phrases
//! are stored lower-cased and trimmed. A phrase may belong to one tier only.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::types::KeywordTier;
use crate::{Result, WellguardError};

// =============================================================================
// BUILT-IN PHRASES
// =============================================================================

const CRITICAL_PHRASES: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "take my own life",
    "want to die",
    "better off dead",
    "no reason to live",
    "end it all",
];

const HIGH_PHRASES: &[&str] = &[
    "self harm",
    "self-harm",
    "hurt myself",
    "cut myself",
    "cutting myself",
    "hopeless",
    "worthless",
    "can't go on",
    "no way out",
    "nobody would care",
];

const MEDIUM_PHRASES: &[&str] = &[
    "panic attack",
    "can't breathe",
    "overwhelmed",
    "depressed",
    "anxious",
    "can't sleep",
    "crying",
    "empty inside",
    "all alone",
];

const LOW_PHRASES: &[&str] = &[
    "stressed",
    "sad",
    "tired",
    "worried",
    "lonely",
    "upset",
    "nervous",
    "frustrated",
    "feeling down",
];

const POSITIVE_PHRASES: &[&str] = &[
    "happy",
    "good day",
    "grateful",
    "hopeful",
    "better today",
    "calm",
    "excited",
    "proud",
    "relaxed",
];

lazy_static! {
    static ref BUILTIN: Arc<Taxonomy> = Arc::new(Taxonomy::from_static(&[
        (KeywordTier::Critical, CRITICAL_PHRASES),
        (KeywordTier::High, HIGH_PHRASES),
        (KeywordTier::Medium, MEDIUM_PHRASES),
        (KeywordTier::Low, LOW_PHRASES),
        (KeywordTier::Positive, POSITIVE_PHRASES),
    ]));
}

/// Phrases of one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierKeywords {
    pub tier: KeywordTier,
    pub keywords: Vec<String>,
}

/// The full tier → phrases table, always held in tier priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    tiers: Vec<TierKeywords>,
}

/// On-disk taxonomy format, one phrase list per tier
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    critical: Vec<String>,
    #[serde(default)]
    high: Vec<String>,
    #[serde(default)]
    medium: Vec<String>,
    #[serde(default)]
    low: Vec<String>,
    #[serde(default)]
    positive: Vec<String>,
}

impl Taxonomy {
    /// Shared built-in taxonomy
    pub fn builtin() -> Arc<Taxonomy> {
        Arc::clone(&BUILTIN)
    }

    /// Build and validate a taxonomy. Tiers not listed are empty.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (KeywordTier, Vec<String>)>,
    {
        let mut by_tier: HashMap<KeywordTier, Vec<String>> = HashMap::new();
        let mut owner: HashMap<String, KeywordTier> = HashMap::new();

        for (tier, phrases) in entries {
            if by_tier.contains_key(&tier) {
                return Err(WellguardError::Taxonomy(format!("tier '{}' listed twice", tier)));
            }

            let mut keywords = Vec::with_capacity(phrases.len());
            for phrase in phrases {
                let phrase = normalize(&phrase);
                if phrase.is_empty() {
                    return Err(WellguardError::Taxonomy(format!("empty phrase in tier '{}'", tier)));
                }
                if let Some(existing) = owner.insert(phrase.clone(), tier) {
                    return Err(WellguardError::Taxonomy(format!(
                        "phrase '{}' appears in both '{}' and '{}'",
                        phrase, existing, tier
                    )));
                }
                keywords.push(phrase);
            }
            by_tier.insert(tier, keywords);
        }

        let tiers = KeywordTier::ALL
            .iter()
            .map(|tier| TierKeywords {
                tier: *tier,
                keywords: by_tier.remove(tier).unwrap_or_default(),
            })
            .collect();

        Ok(Self { tiers })
    }

    /// Load a taxonomy from a JSON file of the form
    /// `{"critical": [...], "high": [...], "medium": [...], "low": [...], "positive": [...]}`
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: TaxonomyFile = serde_json::from_str(&contents)?;

        let taxonomy = Self::new([
            (KeywordTier::Critical, file.critical),
            (KeywordTier::High, file.high),
            (KeywordTier::Medium, file.medium),
            (KeywordTier::Low, file.low),
            (KeywordTier::Positive, file.positive),
        ])?;

        tracing::info!(
            "Loaded taxonomy from {} ({} phrases)",
            path.display(),
            taxonomy.phrase_count()
        );
        Ok(taxonomy)
    }

    /// Built-in tables are known-valid, skip validation
    fn from_static(entries: &[(KeywordTier, &[&str])]) -> Self {
        let tiers = entries
            .iter()
            .map(|(tier, phrases)| TierKeywords {
                tier: *tier,
                keywords: phrases.iter().map(|p| normalize(p)).collect(),
            })
            .collect();
        Self { tiers }
    }

    /// Tiers in priority order, most severe first
    pub fn tiers(&self) -> impl Iterator<Item = &TierKeywords> {
        self.tiers.iter()
    }

    /// Phrases of one tier
    pub fn keywords(&self, tier: KeywordTier) -> &[String] {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of phrases across tiers
    pub fn phrase_count(&self) -> usize {
        self.tiers.iter().map(|t| t.keywords.len()).sum()
    }
}

fn normalize(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================
