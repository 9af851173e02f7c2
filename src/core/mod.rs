//! Core modules for Wellguard

pub mod taxonomy;
pub mod scorer;
pub mod suggestions;
pub mod alert_sink;
pub mod store;
pub mod delivery;
pub mod monitor;
pub mod api;

pub use taxonomy::{Taxonomy, TierKeywords};
pub use scorer::RiskScorer;
pub use suggestions::{suggestions_for, band_suggestions};
pub use alert_sink::{AlertSink, describe};
pub use store::{AlertStore, MemoryStore, JsonFileStore};
pub use delivery::{deliver, load_spool, save_spool, Outbox, RetryPolicy};
pub use monitor::{CrisisMonitor, SubmissionOutcome, AlertDelivery};
pub use api::{create_router, run_server, AppState};
