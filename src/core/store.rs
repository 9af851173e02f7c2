//! Alert store: the persistence collaborator for crisis alerts
//!
//! Inserts are idempotent on `CrisisAlert::idempotency_key`, so a caller
//! may retry a failed insert without creating a second alert.

use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::types::{AlertFilter, AlertId, AlertStatus, CrisisAlert};
use crate::{Result, WellguardError};

/// Storage for crisis alerts
pub trait AlertStore: Send + Sync {
    /// Persist an alert, returning its id. Re-inserting an alert with a
    /// known idempotency key returns the stored alert's id.
    fn insert_alert(&self, alert: &CrisisAlert) -> Result<AlertId>;

    fn get_alert(&self, id: AlertId) -> Result<CrisisAlert>;

    /// Matching alerts, newest first
    fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<CrisisAlert>>;

    /// Move an alert through the counselor workflow
    fn update_status(&self, id: AlertId, status: AlertStatus) -> Result<CrisisAlert>;
}

fn apply_status(alert: &mut CrisisAlert, status: AlertStatus) -> Result<()> {
    if !alert.status.can_transition_to(status) {
        return Err(WellguardError::InvalidTransition {
            from: alert.status,
            to: status,
        });
    }
    if alert.status != status {
        alert.status = status;
        alert.updated_at = Utc::now();
    }
    Ok(())
}

fn newest_first(alerts: &mut [CrisisAlert]) {
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn poisoned<T>(_: T) -> WellguardError {
    WellguardError::Store("lock poisoned".to_string())
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Alerts held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    alerts: RwLock<Vec<CrisisAlert>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertStore for MemoryStore {
    fn insert_alert(&self, alert: &CrisisAlert) -> Result<AlertId> {
        let mut alerts = self.alerts.write().map_err(poisoned)?;
        if let Some(existing) = alerts
            .iter()
            .find(|a| a.idempotency_key == alert.idempotency_key)
        {
            return Ok(existing.id);
        }
        alerts.push(alert.clone());
        Ok(alert.id)
    }

    fn get_alert(&self, id: AlertId) -> Result<CrisisAlert> {
        let alerts = self.alerts.read().map_err(poisoned)?;
        alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(WellguardError::NotFound(id))
    }

    fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<CrisisAlert>> {
        let alerts = self.alerts.read().map_err(poisoned)?;
        let mut found: Vec<CrisisAlert> = alerts.iter().filter(|a| filter.matches(a)).cloned().collect();
        newest_first(&mut found);
        Ok(found)
    }

    fn update_status(&self, id: AlertId, status: AlertStatus) -> Result<CrisisAlert> {
        let mut alerts = self.alerts.write().map_err(poisoned)?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(WellguardError::NotFound(id))?;
        apply_status(alert, status)?;
        Ok(alert.clone())
    }
}

// =============================================================================
// JSON FILES
// =============================================================================

/// Idempotency key to alert id, built from disk on first insert
type KeyIndex = HashMap<String, AlertId>;

/// One pretty-printed JSON file per alert: `<dir>/<id>.json`
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serialises writers so the idempotency check and the write are atomic
    keys: Mutex<Option<KeyIndex>>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keys: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: AlertId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn write(&self, alert: &CrisisAlert) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(alert)?;
        let path = self.path_for(alert.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(path: &Path) -> Result<CrisisAlert> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Every readable alert in the directory. Files that are not alerts
    /// are logged and skipped.
    fn load_all(&self) -> Result<Vec<CrisisAlert>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut alerts = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(alert) => alerts.push(alert),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable alert file");
                }
            }
        }
        Ok(alerts)
    }

    fn build_index(&self) -> Result<KeyIndex> {
        let index: KeyIndex = self
            .load_all()?
            .into_iter()
            .map(|a| (a.idempotency_key, a.id))
            .collect();
        tracing::debug!(dir = %self.dir.display(), alerts = index.len(), "alert key index loaded");
        Ok(index)
    }
}

impl AlertStore for JsonFileStore {
    fn insert_alert(&self, alert: &CrisisAlert) -> Result<AlertId> {
        let mut guard = self.keys.lock().map_err(poisoned)?;
        if guard.is_none() {
            *guard = Some(self.build_index()?);
        }
        let index = guard.get_or_insert_with(KeyIndex::new);
        if let Some(existing) = index.get(&alert.idempotency_key) {
            return Ok(*existing);
        }
        self.write(alert)?;
        index.insert(alert.idempotency_key.clone(), alert.id);
        Ok(alert.id)
    }

    fn get_alert(&self, id: AlertId) -> Result<CrisisAlert> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(WellguardError::NotFound(id));
        }
        Self::read(&path)
    }

    fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<CrisisAlert>> {
        let mut found: Vec<CrisisAlert> = self
            .load_all()?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    fn update_status(&self, id: AlertId, status: AlertStatus) -> Result<CrisisAlert> {
        let _guard = self.keys.lock().map_err(poisoned)?;
        let mut alert = self.get_alert(id)?;
        apply_status(&mut alert, status)?;
        self.write(&alert)?;
        Ok(alert)
    }
}

// =============================================================================
// TESTS
// =============================================================================
