//! Configuration loaded from wellguard.toml
//!
//! Lookup order: explicit path, ./wellguard.toml,
//! <config_dir>/wellguard/config.toml, built-in defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::delivery::RetryPolicy;
use crate::core::store::{AlertStore, JsonFileStore, MemoryStore};
use crate::core::{AlertSink, CrisisMonitor, RiskScorer, Taxonomy};
use crate::{Result, WellguardError, ALERT_SEVERITY_THRESHOLD, PREVIEW_MIN_CHARS};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub delivery: DeliverySettings,
    pub scoring: ScoringSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    #[default]
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub kind: StoreKind,
    /// Alert directory for the json store
    pub dir: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::Json,
            dir: PathBuf::from("./alerts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    /// How often the server retries queued alerts
    pub flush_interval_secs: u64,
    /// File keeping queued alerts across restarts; empty disables it
    pub spool_path: PathBuf,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
            flush_interval_secs: 30,
            spool_path: PathBuf::from("./wellguard-outbox.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub preview_min_chars: usize,
    /// Compressed 1-5 severity that raises an alert
    pub alert_severity_threshold: u8,
    /// JSON taxonomy replacing the built-in phrases
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            preview_min_chars: PREVIEW_MIN_CHARS,
            alert_severity_threshold: ALERT_SEVERITY_THRESHOLD,
            taxonomy_path: None,
        }
    }
}

impl Settings {
    /// Load settings, searching the default locations when `path` is None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.exists()),
        };

        let settings = match path {
            Some(path) => {
                let contents = fs::read_to_string(&path).map_err(|e| {
                    WellguardError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                let settings = Self::from_toml(&contents)?;
                tracing::info!("Loaded configuration from {}", path.display());
                settings
            }
            None => Self::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delivery.max_attempts == 0 {
            return Err(WellguardError::Config("delivery.max_attempts must be at least 1".into()));
        }
        if !(1..=5).contains(&self.scoring.alert_severity_threshold) {
            return Err(WellguardError::Config(format!(
                "scoring.alert_severity_threshold must be 1-5, got {}",
                self.scoring.alert_severity_threshold
            )));
        }
        if self.delivery.flush_interval_secs == 0 {
            return Err(WellguardError::Config("delivery.flush_interval_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.delivery.max_attempts,
            Duration::from_millis(self.delivery.base_backoff_ms),
        )
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.delivery.flush_interval_secs)
    }

    /// Scorer over the configured taxonomy
    pub fn build_scorer(&self) -> Result<RiskScorer> {
        match &self.scoring.taxonomy_path {
            Some(path) => Ok(RiskScorer::with_taxonomy(Arc::new(Taxonomy::load_from_file(path)?))),
            None => Ok(RiskScorer::new()),
        }
    }

    pub fn build_store(&self) -> Arc<dyn AlertStore> {
        match self.store.kind {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::Json => Arc::new(JsonFileStore::new(self.store.dir.clone())),
        }
    }

    /// Monitor wired from these settings, with any spooled alerts restored
    pub fn build_monitor(&self) -> Result<CrisisMonitor> {
        let monitor = CrisisMonitor::new(self.build_store())
            .with_scorer(self.build_scorer()?)
            .with_sink(AlertSink::with_threshold(self.scoring.alert_severity_threshold))
            .with_retry(self.retry_policy())
            .with_preview_min_chars(self.scoring.preview_min_chars);

        if self.delivery.spool_path.as_os_str().is_empty() {
            return Ok(monitor);
        }
        monitor.with_spool(self.delivery.spool_path.clone())
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("wellguard.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("wellguard").join("config.toml"));
    }
    paths
}
