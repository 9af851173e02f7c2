use thiserror::Error;

use crate::types::{AlertId, AlertStatus};

#[derive(Error, Debug)]
pub enum WellguardError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Taxonomy Error: {0}")]
    Taxonomy(String),

    #[error("Alert Store Error: {0}")]
    Store(String),

    #[error("Alert not found: {0}")]
    NotFound(AlertId),

    #[error("Invalid alert id: {0}")]
    InvalidAlertId(String),

    #[error("Cannot move alert from {from} to {to}")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },
}

pub type Result<T> = std::result::Result<T, WellguardError>;
