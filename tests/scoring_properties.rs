//! Integration tests for the scoring engine and alert threshold
//!
//! Tests the full path: text → RiskScorer → ScoreResult → AlertSink

use pretty_assertions::assert_eq;
use wellguard::core::{band_suggestions, suggestions_for, AlertSink, RiskScorer};
use wellguard::types::{compressed_severity, KeywordTier, RiskBand, RiskCategory, ScoreResult};

fn scored(level: u8) -> ScoreResult {
    ScoreResult {
        level,
        category: RiskCategory::Medium,
        matched_keywords: vec!["phrase".to_string()],
        suggestions: suggestions_for(level),
    }
}

#[test]
fn test_determinism() {
    let scorer = RiskScorer::new();
    let text = "I've been crying a lot, stressed about exams and feeling hopeless";
    let first = scorer.score(text);
    for _ in 0..10 {
        assert_eq!(scorer.score(text), first);
    }
}

#[test]
fn test_case_insensitivity() {
    let scorer = RiskScorer::new();
    let lower = scorer.score("I want to end my life");
    let upper = scorer.score("I WANT TO END MY LIFE");
    assert_eq!(lower.level, upper.level);
    assert_eq!(lower.category, upper.category);
    assert_eq!(upper.category, RiskCategory::Critical);
}

#[test]
fn test_clamped_at_ten() {
    let result = RiskScorer::new().score(
        "suicidal, hopeless, worthless, overwhelmed, depressed, anxious, stressed and sad",
    );
    assert_eq!(result.level, 10);
    assert_eq!(result.category, RiskCategory::Critical);
}

#[test]
fn test_empty_input() {
    let scorer = RiskScorer::new();
    for text in ["", "   "] {
        let result = scorer.score(text);
        assert_eq!(result.level, 0);
        assert_eq!(result.category, RiskCategory::None);
        assert_eq!(result.matched_keywords, Vec::<String>::new());
    }
}

#[test]
fn test_suggestion_bands_by_level() {
    let expected = [
        (0, RiskBand::Stable),
        (2, RiskBand::Stable),
        (3, RiskBand::Mild),
        (4, RiskBand::Mild),
        (5, RiskBand::Moderate),
        (6, RiskBand::Moderate),
        (7, RiskBand::Elevated),
        (8, RiskBand::Elevated),
        (9, RiskBand::Crisis),
        (10, RiskBand::Crisis),
    ];
    for (level, band) in expected {
        let suggestions: Vec<String> = band_suggestions(band).iter().map(|s| s.to_string()).collect();
        assert_eq!(suggestions_for(level), suggestions, "level {}", level);
    }
}

#[test]
fn test_scored_levels_land_in_band() {
    let scorer = RiskScorer::new();
    let cases = [
        ("a bit sad today", 3, RiskBand::Mild),
        ("sad and tired", 6, RiskBand::Moderate),
        ("I've been so anxious lately", 5, RiskBand::Moderate),
        ("everything feels hopeless", 8, RiskBand::Elevated),
        ("sad, tired and worried", 9, RiskBand::Crisis),
    ];
    for (text, level, band) in cases {
        let result = scorer.score(text);
        assert_eq!(result.level, level, "{}", text);
        assert_eq!(result.band(), band, "{}", text);
        assert_eq!(result.suggestions, suggestions_for(level), "{}", text);
    }
}

#[test]
fn test_critical_keyword_triggers_max_band() {
    let result = RiskScorer::new().score("I want to kill myself");
    assert!(result.level >= 9);
    assert_eq!(result.category, RiskCategory::Critical);
    assert!(result.suggestions.iter().any(|s| s.contains("Crisis Lifeline")));
}

#[test]
fn test_positive_text_does_not_alert() {
    let result = RiskScorer::new().score("I had a really good day, feeling hopeful and grateful");
    assert_eq!(result.category, RiskCategory::Positive);
    assert!(result.level <= 2);
    assert!(AlertSink::new().to_alert(&result, "student-1", "I had a really good day").is_none());
}

#[test]
fn test_additive_saturation() {
    // Five low-tier phrases: 5 x 3 = 15, clamped to 10
    let result = RiskScorer::new().score("Stressed, sad, tired, worried and nervous about everything");
    assert_eq!(result.matched_keywords.len(), 5);
    assert_eq!(result.level, 10);
    assert_eq!(result.category, RiskCategory::Low);
}

#[test]
fn test_alert_iff_compressed_severity_at_least_three() {
    let sink = AlertSink::new();
    for level in 0..=10u8 {
        let alert = sink.to_alert(&scored(level), "s", "text");
        assert_eq!(alert.is_some(), compressed_severity(level) >= 3, "level {}", level);
    }
}

#[test]
fn test_tier_severity_matches_compressed_weight() {
    for tier in KeywordTier::ALL {
        assert_eq!(tier.severity(), compressed_severity(tier.weight()), "{}", tier);
    }
}
