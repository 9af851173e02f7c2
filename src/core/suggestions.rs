//! Suggestion table keyed by risk band

use crate::types::RiskBand;

const CRISIS_SUGGESTIONS: &[&str] = &[
    "Please reach out to a mental health professional right away.",
    "Call or text the 988 Suicide & Crisis Lifeline, available 24/7.",
    "If you are in immediate danger, call emergency services (911).",
    "You are not alone. Help is available right now.",
];

const ELEVATED_SUGGESTIONS: &[&str] = &[
    "Consider booking an appointment with a counselor.",
    "Connect with a peer supporter who has been through something similar.",
    "Text HOME to 741741 to reach the Crisis Text Line.",
    "Your feelings are valid, and talking about them can help.",
];

const MODERATE_SUGGESTIONS: &[&str] = &[
    "Try a breathing exercise: in for 4, hold for 4, out for 4.",
    "Talk to someone you trust about how you are feeling.",
    "Browse the coping resources in the wellness library.",
    "Difficult feelings are temporary, even when they do not feel that way.",
];

const MILD_SUGGESTIONS: &[&str] = &[
    "Take some time for self-care today.",
    "A short mindfulness or meditation session might help.",
    "Stay connected with friends and family.",
    "Keep tracking your mood to notice patterns.",
];

const STABLE_SUGGESTIONS: &[&str] = &[
    "Great to hear from you. Keep up the positive momentum!",
    "Keep doing what helps you feel good.",
];

/// Suggestions for a risk level, selected by band
pub fn suggestions_for(level: u8) -> Vec<String> {
    band_suggestions(RiskBand::from_level(level))
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// The fixed suggestion set of a band
pub fn band_suggestions(band: RiskBand) -> &'static [&'static str] {
    match band {
        RiskBand::Crisis => CRISIS_SUGGESTIONS,
        RiskBand::Elevated => ELEVATED_SUGGESTIONS,
        RiskBand::Moderate => MODERATE_SUGGESTIONS,
        RiskBand::Mild => MILD_SUGGESTIONS,
        RiskBand::Stable => STABLE_SUGGESTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_band_lists_hotline() {
        assert!(suggestions_for(9).iter().any(|s| s.contains("988")));
        assert!(suggestions_for(10).iter().any(|s| s.contains("emergency services")));
    }

    #[test]
    fn test_bands_are_distinct() {
        let bands = [
            RiskBand::Crisis,
            RiskBand::Elevated,
            RiskBand::Moderate,
            RiskBand::Mild,
            RiskBand::Stable,
        ];
        for (i, a) in bands.iter().enumerate() {
            for b in &bands[i + 1..] {
                assert_ne!(band_suggestions(*a), band_suggestions(*b));
            }
        }
    }
}
