//! Panel configuration, read from an optional RON file.
//!
//! Connection credentials are never part of the configuration; they are only
//! supplied through the connect endpoints and kept in memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use davpanel_core::DEFAULT_MIN_SIZE_MB;
use davpanel_engine::ClientSettings;
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const CONFIG_ENV_VAR: &str = "DAVPANEL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "./davpanel.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    /// Size threshold used when a download request does not name one.
    pub default_min_size_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("./davpanel.log"),
            log_level: "info".to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            default_min_size_mb: DEFAULT_MIN_SIZE_MB,
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ClientSettings::default()
        }
    }
}

/// Config file location: `$DAVPANEL_CONFIG` when set, else `./davpanel.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Reads the config file. A missing file is `Ok(None)`.
pub fn load_config(path: &Path) -> anyhow::Result<Option<AppConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("reading config from {}", path.display()))
        }
    };
    let config = ron::from_str(&content)
        .with_context(|| format!("parsing config from {}", path.display()))?;
    Ok(Some(config))
}
