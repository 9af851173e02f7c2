//! At-least-once delivery of crisis alerts to a store
//!
//! A failed insert is retried with exponential backoff. When every attempt
//! fails the alert goes to the outbox, which is flushed later. Alerts are
//! never dropped: an outbox with a spool file mirrors its queue to disk so
//! queued alerts survive a restart.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::core::store::AlertStore;
use crate::types::{AlertId, CrisisAlert};
use crate::Result;

/// How often and how patiently to retry a store write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub max_attempts: u32,
    /// Wait before the second attempt, doubled after each failure
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    /// Wait after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1u32 << exp)
    }
}

/// Insert `alert`, retrying per `policy`. Returns the last error when
/// every attempt failed.
pub async fn deliver(store: &dyn AlertStore, alert: &CrisisAlert, policy: &RetryPolicy) -> Result<AlertId> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match store.insert_alert(alert) {
            Ok(id) => {
                tracing::info!(
                    alert_id = %id,
                    subject_id = %alert.subject_id,
                    severity = alert.severity_level,
                    attempt,
                    "crisis alert stored"
                );
                return Ok(id);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    alert_id = %alert.id,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "alert write failed, retrying"
                );
                tokio::time::sleep(policy.backoff(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Queued alerts saved by a previous run. A missing file is an empty queue.
pub fn load_spool(path: &Path) -> Result<Vec<CrisisAlert>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Replace the spool with `alerts`; an empty queue removes the file
pub fn save_spool(path: &Path, alerts: &[CrisisAlert]) -> Result<()> {
    if alerts.is_empty() {
        if path.exists() {
            fs::remove_file(path)?;
        }
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_string_pretty(alerts)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Alerts waiting for redelivery, oldest first
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Mutex<VecDeque<CrisisAlert>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outbox starting with alerts restored from a spool
    pub fn from_alerts(alerts: Vec<CrisisAlert>) -> Self {
        Self {
            queue: Mutex::new(alerts.into()),
        }
    }

    pub async fn push(&self, alert: CrisisAlert) {
        tracing::error!(
            alert_id = %alert.id,
            subject_id = %alert.subject_id,
            severity = alert.severity_level,
            "alert store unavailable, alert queued for redelivery"
        );
        self.queue.lock().await.push_back(alert);
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }

    /// Try every queued alert once; failures stay queued in order.
    /// Returns how many were delivered.
    pub async fn flush(&self, store: &dyn AlertStore) -> usize {
        let mut queue = self.queue.lock().await;
        let mut remaining = VecDeque::with_capacity(queue.len());
        let mut delivered = 0;

        while let Some(alert) = queue.pop_front() {
            match store.insert_alert(&alert) {
                Ok(id) => {
                    tracing::info!(alert_id = %id, "queued alert delivered");
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(alert_id = %alert.id, error = %e, "queued alert still undeliverable");
                    remaining.push_back(alert);
                }
            }
        }

        *queue = remaining;
        delivered
    }

    /// Copy of the queue, oldest first
    pub async fn snapshot(&self) -> Vec<CrisisAlert> {
        self.queue.lock().await.iter().cloned().collect()
    }

    /// Mirror the queue to a spool file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let queue = self.queue.lock().await;
        let alerts: Vec<CrisisAlert> = queue.iter().cloned().collect();
        save_spool(path, &alerts)
    }
}
