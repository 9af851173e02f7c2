//! Suggestion bands over the 0-10 risk level

use serde::{Deserialize, Serialize};
use crate::{BAND_CRISIS, BAND_ELEVATED, BAND_MODERATE, BAND_MILD};

/// The five bands a risk level falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    /// Level >= 9, immediate professional support
    Crisis,
    /// Level >= 7, counselor follow-up
    Elevated,
    /// Level >= 5, coping strategies
    Moderate,
    /// Level >= 3, self-care
    Mild,
    /// Level < 3
    Stable,
}

impl RiskBand {
    /// First band whose lower bound the level reaches
    pub fn from_level(level: u8) -> Self {
        if level >= BAND_CRISIS {
            RiskBand::Crisis
        } else if level >= BAND_ELEVATED {
            RiskBand::Elevated
        } else if level >= BAND_MODERATE {
            RiskBand::Moderate
        } else if level >= BAND_MILD {
            RiskBand::Mild
        } else {
            RiskBand::Stable
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            RiskBand::Crisis => "\x1b[1;31m",  // Bold red
            RiskBand::Elevated => "\x1b[31m",  // Red
            RiskBand::Moderate => "\x1b[33m",  // Yellow
            RiskBand::Mild => "\x1b[36m",      // Cyan
            RiskBand::Stable => "\x1b[32m",    // Green
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for band
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskBand::Crisis => "🆘",
            RiskBand::Elevated => "🔴",
            RiskBand::Moderate => "🔶",
            RiskBand::Mild => "🔹",
            RiskBand::Stable => "🌱",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskBand::Crisis => "CRISIS",
            RiskBand::Elevated => "ELEVATED",
            RiskBand::Moderate => "MODERATE",
            RiskBand::Mild => "MILD",
            RiskBand::Stable => "STABLE",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskBand::from_level(10), RiskBand::Crisis);
        assert_eq!(RiskBand::from_level(9), RiskBand::Crisis);
        assert_eq!(RiskBand::from_level(8), RiskBand::Elevated);
        assert_eq!(RiskBand::from_level(7), RiskBand::Elevated);
        assert_eq!(RiskBand::from_level(6), RiskBand::Moderate);
        assert_eq!(RiskBand::from_level(5), RiskBand::Moderate);
        assert_eq!(RiskBand::from_level(4), RiskBand::Mild);
        assert_eq!(RiskBand::from_level(3), RiskBand::Mild);
        assert_eq!(RiskBand::from_level(2), RiskBand::Stable);
        assert_eq!(RiskBand::from_level(0), RiskBand::Stable);
    }
}
