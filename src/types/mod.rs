//! Core types for Wellguard

mod tier;
mod band;
mod score;
mod alert;
mod output;
mod reason;

pub use tier::{KeywordTier, RiskCategory};
pub use band::RiskBand;
pub use score::{ScoreResult, compressed_severity};
pub use alert::{AlertId, AlertType, AlertStatus, CrisisAlert, AlertFilter};
pub use output::ScoreOutput;
pub use reason::ReasonCode;
