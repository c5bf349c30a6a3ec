#[cfg(feature = "cli")]
pub mod args;
pub mod storage;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_DATA_DIR: &str = "Data";
pub const DEFAULT_CRIME_FILE: &str = "crime_cleaned.csv";
pub const DEFAULT_BOUNDARIES_FILE: &str = "london-boroughs_1179.geojson";

/// Fully resolved settings: defaults, then the TOML file, then command line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub crime_file: String,
    pub boundaries_file: String,
    pub log_json: bool,
    pub monitor: bool,
    pub probe_attempts: u32,
    pub probe_interval_ms: u64,
    pub shutdown_grace_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            crime_file: DEFAULT_CRIME_FILE.to_string(),
            boundaries_file: DEFAULT_BOUNDARIES_FILE.to_string(),
            log_json: false,
            monitor: false,
            probe_attempts: 30,
            probe_interval_ms: 500,
            shutdown_grace_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn apply_toml(&mut self, file: &TomlConfig) {
        if let Some(server) = &file.server {
            if let Some(host) = &server.host {
                self.host = host.clone();
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(grace) = server.shutdown_grace_ms {
                self.shutdown_grace_ms = grace;
            }
        }
        if let Some(data) = &file.data {
            if let Some(dir) = &data.dir {
                self.data_dir = dir.clone();
            }
            if let Some(crime_file) = &data.crime_file {
                self.crime_file = crime_file.clone();
            }
            if let Some(boundaries_file) = &data.boundaries_file {
                self.boundaries_file = boundaries_file.clone();
            }
        }
        if let Some(logging) = &file.logging {
            if let Some(json) = logging.json {
                self.log_json = json;
            }
        }
        if let Some(monitoring) = &file.monitoring {
            self.monitor = monitoring.enabled;
        }
        if let Some(probe) = &file.probe {
            if let Some(attempts) = probe.attempts {
                self.probe_attempts = attempts;
            }
            if let Some(interval) = probe.interval_ms {
                self.probe_interval_ms = interval;
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn health_url(&self) -> String {
        format!("http://{}/healthz", self.bind_address())
    }

    pub fn crime_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.crime_file)
    }

    pub fn boundaries_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.boundaries_file)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl ConfigProvider for AppConfig {
    fn crime_file(&self) -> &str {
        &self.crime_file
    }

    fn boundaries_file(&self) -> &str {
        &self.boundaries_file
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_path("data.dir", &self.data_dir)?;
        validate_path("data.crime_file", &self.crime_file)?;
        validate_file_extension("data.crime_file", &self.crime_file, &["csv"])?;
        validate_path("data.boundaries_file", &self.boundaries_file)?;
        validate_file_extension("data.boundaries_file", &self.boundaries_file, &["geojson", "json"])?;
        validate_range("probe.attempts", self.probe_attempts, 1, 10_000)?;
        validate_url("probe.url", &self.health_url())?;
        Ok(())
    }
}
