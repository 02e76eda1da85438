use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::page::{OledPage, PageSet};
use crate::core::selection::SensorSelection;
use crate::error::{OledSenseError, Result};

pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 10000;

/// Daemon settings, stored as JSON so pages are hand-editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub update_interval_ms: u64,
    /// Delay between delivery retries. Non-positive falls back to 5000.
    pub retry_interval_ms: i64,
    /// Maximum quiet time before a keep-alive is sent. Non-positive falls
    /// back to 10000.
    pub heartbeat_interval_ms: i64,
    pub pages: Vec<OledPage>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS as i64,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS as i64,
            pages: default_pages(),
        }
    }
}

/// Three example pages: temperatures, loads, memory.
fn default_pages() -> Vec<OledPage> {
    vec![
        OledPage::new(
            5000,
            43,
            vec![
                SensorSelection::new("CPU Package", "Cpu", "Temperature")
                    .with_format("CPU: ", " °C", 0),
                SensorSelection::new("GPU Core", "GpuNvidia", "Temperature")
                    .with_format("GPU: ", " °C", 0),
            ],
        ),
        OledPage::new(
            3000,
            27,
            vec![
                SensorSelection::new("CPU Total", "Cpu", "Load").with_format("CPU: ", "%", 0),
                SensorSelection::new("GPU Core", "GpuNvidia", "Load").with_format("GPU: ", "%", 0),
            ],
        ),
        OledPage::new(
            3000,
            29,
            vec![
                SensorSelection::new("Memory Used", "Memory", "Data").with_format("Mem: ", "GB", 1),
            ],
        ),
    ]
}

impl Settings {
    /// Load settings from the default location, or from `path` when given.
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// a configuration error, not a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !settings_path.exists() {
            log::info!(
                "no settings file at {}, using defaults",
                settings_path.display()
            );
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(&settings_path)?;
        let settings: Settings = serde_json::from_str(&data).map_err(|e| {
            OledSenseError::config(format!(
                "invalid settings file {}: {}",
                settings_path.display(),
                e
            ))
        })?;
        Ok(settings)
    }

    fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| OledSenseError::config("could not determine config directory"))?;
        Ok(config_dir.join("oledsense").join("settings.json"))
    }

    /// Validate the page configuration into a schedulable [`PageSet`].
    pub fn page_set(&self) -> Result<PageSet> {
        PageSet::new(self.pages.clone())
    }

    /// Retry interval with the documented non-positive fallback applied.
    pub fn retry_interval_ms(&self) -> u64 {
        if self.retry_interval_ms > 0 {
            self.retry_interval_ms as u64
        } else {
            DEFAULT_RETRY_INTERVAL_MS
        }
    }

    /// Heartbeat interval with the documented non-positive fallback applied.
    pub fn heartbeat_interval_ms(&self) -> u64 {
        if self.heartbeat_interval_ms > 0 {
            self.heartbeat_interval_ms as u64
        } else {
            DEFAULT_HEARTBEAT_INTERVAL_MS
        }
    }

    pub fn update_interval_ms(&self) -> u64 {
        if self.update_interval_ms > 0 {
            self.update_interval_ms
        } else {
            DEFAULT_UPDATE_INTERVAL_MS
        }
    }
}
