//! Crisis alert records handed to the alert store

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::types::RiskCategory;
use crate::WellguardError;

/// Opaque alert identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(Uuid);

impl AlertId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AlertId {
    type Err = WellguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(AlertId)
            .map_err(|_| WellguardError::InvalidAlertId(s.to_string()))
    }
}

/// Kind of crisis an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    SuicideIdeation,
    SelfHarm,
    SevereAnxiety,
    Other,
}

impl From<RiskCategory> for AlertType {
    fn from(category: RiskCategory) -> Self {
        match category {
            RiskCategory::Critical => AlertType::SuicideIdeation,
            RiskCategory::High => AlertType::SelfHarm,
            RiskCategory::Medium => AlertType::SevereAnxiety,
            RiskCategory::Low | RiskCategory::Positive | RiskCategory::None => AlertType::Other,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertType::SuicideIdeation => "suicide_ideation",
            AlertType::SelfHarm => "self_harm",
            AlertType::SevereAnxiety => "severe_anxiety",
            AlertType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Counselor workflow status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Addressed,
    Monitoring,
    Resolved,
}

impl AlertStatus {
    /// Whether the workflow may move an alert from `self` to `next`.
    /// Re-applying the current status is allowed.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        use AlertStatus::*;
        if *self == next {
            return true;
        }
        match self {
            Pending => matches!(next, Addressed | Monitoring | Resolved),
            Addressed => matches!(next, Monitoring | Resolved),
            Monitoring => matches!(next, Addressed | Resolved),
            Resolved => false,
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Addressed => "addressed",
            AlertStatus::Monitoring => "monitoring",
            AlertStatus::Resolved => "resolved",
        };
        write!(f, "{}", name)
    }
}

/// A persisted crisis alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisAlert {
    pub id: AlertId,
    /// Who wrote the text
    pub subject_id: String,
    pub alert_type: AlertType,
    /// Compressed 1-5 severity
    pub severity_level: u8,
    /// 0-10 level the alert was raised at
    pub risk_level: u8,
    /// Truncated quote plus matched keywords
    pub description: String,
    pub matched_keywords: Vec<String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stores treat inserts with an existing key as the same alert
    pub idempotency_key: String,
}

/// Selection for listing alerts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    #[serde(default)]
    pub status: Option<AlertStatus>,
    #[serde(default)]
    pub subject_id: Option<String>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &CrisisAlert) -> bool {
        self.status.map_or(true, |s| alert.status == s)
            && self
                .subject_id
                .as_deref()
                .map_or(true, |s| alert.subject_id == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_type_lookup() {
        assert_eq!(AlertType::from(RiskCategory::Critical), AlertType::SuicideIdeation);
        assert_eq!(AlertType::from(RiskCategory::High), AlertType::SelfHarm);
        assert_eq!(AlertType::from(RiskCategory::Medium), AlertType::SevereAnxiety);
        assert_eq!(AlertType::from(RiskCategory::Low), AlertType::Other);
        assert_eq!(AlertType::from(RiskCategory::Positive), AlertType::Other);
    }

    #[test]
    fn test_lifecycle_transitions() {
        use AlertStatus::*;
        assert!(Pending.can_transition_to(Addressed));
        assert!(Pending.can_transition_to(Resolved));
        assert!(Monitoring.can_transition_to(Addressed));
        assert!(Addressed.can_transition_to(Addressed));
        assert!(!Addressed.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(Monitoring));
    }

    #[test]
    fn test_alert_id_parse() {
        let id = AlertId::new();
        let parsed: AlertId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<AlertId>().is_err());
    }
}
