//! Configuration management module.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{PipelineOptions, ZoneSetting};

/// Environment variable overriding the reporting API base URL.
pub const API_URL_ENV: &str = "ATTENDANCE_API_URL";

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Where the attendance workbook is looked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URLs or file paths, tried in order.
    pub candidates: Vec<String>,
    /// Per-request timeout for URL candidates; unset means wait indefinitely.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

/// Normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// `"local"` or an IANA zone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// `HH:MM`; sign-ins strictly after this are late.
    #[serde(default = "default_late_after")]
    pub late_after: String,
}

fn default_timezone() -> String {
    "local".to_string()
}

fn default_late_after() -> String {
    "10:00".to_string()
}

/// Reporting API settings (not used by the load pipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "gianged", "attendance-dashboard")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.candidates.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "At least one source candidate is required".to_string(),
            ));
        }
        if self.source.fetch_timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "Fetch timeout must be greater than 0 seconds".to_string(),
            ));
        }
        self.pipeline.zone()?;
        self.pipeline.late_after_time()?;
        if !self.api.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api.apply_override(&url);
        }
        self
    }

    /// Pipeline options derived from the `[pipeline]` section.
    pub fn pipeline_options(&self) -> Result<PipelineOptions, ConfigError> {
        Ok(PipelineOptions {
            zone: self.pipeline.zone()?,
            late_after: self.pipeline.late_after_time()?,
        })
    }
}

impl PipelineConfig {
    pub fn zone(&self) -> Result<ZoneSetting, ConfigError> {
        self.timezone.parse().map_err(ConfigError::Validation)
    }

    pub fn late_after_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.late_after.trim(), "%H:%M").map_err(|_| {
            ConfigError::Validation(format!("Late threshold '{}' must be HH:MM", self.late_after))
        })
    }
}

impl ApiConfig {
    fn apply_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.base_url = url.trim_end_matches('/').to_string();
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "attendance.xlsx".to_string(),
                "./public/attendance.xlsx".to_string(),
                "http://localhost:3000/attendance.xlsx".to_string(),
            ],
            fetch_timeout_secs: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            late_after: default_late_after(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
        }
    }
}
