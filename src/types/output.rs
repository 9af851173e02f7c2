//! Output structures for terminal display and the /score endpoint

use serde::{Deserialize, Serialize};
use crate::types::{RiskBand, ScoreResult};

/// A score plus everything a caller derives from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutput {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub band: RiskBand,
    /// Compressed 1-5 severity
    pub severity: u8,
    /// Whether a submission with this score would raise an alert
    pub alert_recommended: bool,
}

impl ScoreOutput {
    pub fn new(result: ScoreResult, alert_recommended: bool) -> Self {
        Self {
            band: result.band(),
            severity: result.severity(),
            alert_recommended,
            result,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.band.color_code();
        let reset = RiskBand::color_reset();
        let emoji = self.band.emoji();

        format!(
            "{}{} risk={}/10 | band={} | category={} | severity={}/5{}{}",
            color,
            emoji,
            self.result.level,
            self.band,
            self.result.category,
            self.severity,
            if self.alert_recommended { " | ALERT" } else { "" },
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "risk={} | band={} | category={} | severity={} | alert={}",
            self.result.level,
            self.band,
            self.result.category,
            self.severity,
            self.alert_recommended
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskCategory;

    #[test]
    fn test_parseable_string() {
        let result = ScoreResult {
            level: 8,
            category: RiskCategory::High,
            matched_keywords: vec!["hopeless".to_string()],
            suggestions: vec![],
        };
        let output = ScoreOutput::new(result, true);
        assert_eq!(
            output.to_parseable_string(),
            "risk=8 | band=ELEVATED | category=high | severity=4 | alert=true"
        );
    }

    #[test]
    fn test_flattened_json() {
        let result = ScoreResult {
            level: 0,
            category: RiskCategory::None,
            matched_keywords: vec![],
            suggestions: vec![],
        };
        let json = serde_json::to_value(ScoreOutput::new(result, false)).unwrap();
        assert_eq!(json["level"], 0);
        assert_eq!(json["band"], "STABLE");
        assert_eq!(json["category"], "none");
    }
}
