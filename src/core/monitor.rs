//! Crisis monitor: the two places text enters the classifier
//!
//! - `submit_entry`: a mood entry was saved; score it and raise an alert
//! - `preview`: text is being typed; score it for on-screen suggestions
//!
//! Both go through the same scorer, so preview and stored scores agree.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::delivery::{deliver, load_spool, Outbox, RetryPolicy};
use crate::core::store::AlertStore;
use crate::core::{AlertSink, RiskScorer};
use crate::types::{AlertId, ReasonCode, RiskCategory, ScoreResult};
use crate::{Result, PREVIEW_MIN_CHARS};

/// What happened to the alert of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AlertDelivery {
    /// Score below threshold
    NotRaised,
    /// Alert stored
    Delivered { alert_id: AlertId },
    /// Store unavailable, alert waiting in the outbox
    Queued { alert_id: AlertId },
}

/// Result of a mood-entry submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub result: ScoreResult,
    pub alert: AlertDelivery,
    pub reason: ReasonCode,
}

/// Shared scorer, sink, store and outbox
pub struct CrisisMonitor {
    scorer: RiskScorer,
    sink: AlertSink,
    store: Arc<dyn AlertStore>,
    outbox: Outbox,
    /// File mirroring the outbox across restarts
    spool: Option<PathBuf>,
    retry: RetryPolicy,
    preview_min_chars: usize,
}

impl CrisisMonitor {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self {
            scorer: RiskScorer::new(),
            sink: AlertSink::new(),
            store,
            outbox: Outbox::new(),
            spool: None,
            retry: RetryPolicy::default(),
            preview_min_chars: PREVIEW_MIN_CHARS,
        }
    }

    pub fn with_scorer(mut self, scorer: RiskScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_sink(mut self, sink: AlertSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_preview_min_chars(mut self, min_chars: usize) -> Self {
        self.preview_min_chars = min_chars;
        self
    }

    /// Mirror the outbox to `path`, restoring alerts a previous run left there
    pub fn with_spool(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let restored = load_spool(&path)?;
        if !restored.is_empty() {
            tracing::warn!(
                spool = %path.display(),
                alerts = restored.len(),
                "restored undelivered alerts from spool"
            );
        }
        self.outbox = Outbox::from_alerts(restored);
        self.spool = Some(path);
        Ok(self)
    }

    pub fn spool(&self) -> Option<&Path> {
        self.spool.as_deref()
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn sink(&self) -> &AlertSink {
        &self.sink
    }

    pub fn store(&self) -> &Arc<dyn AlertStore> {
        &self.store
    }

    /// Score in-progress text. `None` until the trimmed text is longer
    /// than the minimum length. Never raises an alert.
    pub fn preview(&self, text: &str) -> Option<ScoreResult> {
        if text.trim().chars().count() <= self.preview_min_chars {
            return None;
        }
        Some(self.scorer.score(text))
    }

    /// Score a saved mood entry and deliver at most one alert. Never
    /// fails: a store outage queues the alert instead.
    pub async fn submit_entry(&self, subject_id: &str, raw_text: &str) -> SubmissionOutcome {
        let result = self.scorer.score(raw_text);

        let Some(alert) = self.sink.to_alert_at(&result, subject_id, raw_text, Utc::now()) else {
            let reason = if raw_text.trim().is_empty() {
                ReasonCode::R101_EMPTY_INPUT
            } else if result.is_clear() {
                ReasonCode::R102_NO_KEYWORDS
            } else if result.category == RiskCategory::Positive {
                ReasonCode::R103_POSITIVE_ONLY
            } else {
                ReasonCode::R201_BELOW_THRESHOLD
            };
            return SubmissionOutcome {
                result,
                alert: AlertDelivery::NotRaised,
                reason,
            };
        };

        tracing::warn!(
            subject_id,
            level = result.level,
            category = result.category.name(),
            alert_type = %alert.alert_type,
            "crisis threshold reached"
        );

        match deliver(self.store.as_ref(), &alert, &self.retry).await {
            Ok(alert_id) => SubmissionOutcome {
                result,
                alert: AlertDelivery::Delivered { alert_id },
                reason: ReasonCode::R301_ALERT_DELIVERED,
            },
            Err(e) => {
                tracing::error!(alert_id = %alert.id, error = %e, "alert delivery exhausted retries");
                let alert_id = alert.id;
                self.outbox.push(alert).await;
                self.save_spool().await;
                SubmissionOutcome {
                    result,
                    alert: AlertDelivery::Queued { alert_id },
                    reason: ReasonCode::R302_ALERT_QUEUED,
                }
            }
        }
    }

    /// Redeliver queued alerts, returning how many were stored
    pub async fn flush_outbox(&self) -> usize {
        if self.outbox.is_empty().await {
            return 0;
        }
        let delivered = self.outbox.flush(self.store.as_ref()).await;
        if delivered > 0 {
            self.save_spool().await;
        }
        delivered
    }

    /// Alerts waiting for redelivery
    pub async fn pending_alerts(&self) -> usize {
        self.outbox.len().await
    }

    /// Last flush before exit. Returns the ids still undelivered, each of
    /// which is logged at `error` along with where it was kept.
    pub async fn shutdown(&self) -> Vec<AlertId> {
        self.flush_outbox().await;
        self.save_spool().await;

        let undelivered = self.outbox.snapshot().await;
        for alert in &undelivered {
            match &self.spool {
                Some(path) => tracing::error!(
                    alert_id = %alert.id,
                    subject_id = %alert.subject_id,
                    spool = %path.display(),
                    "alert undelivered at shutdown, kept in spool"
                ),
                None => tracing::error!(
                    alert_id = %alert.id,
                    subject_id = %alert.subject_id,
                    severity = alert.severity_level,
                    "alert undelivered at shutdown, no spool configured"
                ),
            }
        }
        undelivered.into_iter().map(|a| a.id).collect()
    }

    async fn save_spool(&self) {
        let Some(path) = &self.spool else {
            return;
        };
        if let Err(e) = self.outbox.save(path).await {
            tracing::error!(spool = %path.display(), error = %e, "failed to write outbox spool");
        }
    }
}
