//! Application configuration
//!
//! Provides centralized configuration management with:
//! - Config file loading (optional, TOML)
//! - Environment variable overrides
//! - Runtime defaults
//! - Validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

const LOG_FORMATS: &[&str] = &["pretty", "json"];
const LOG_OUTPUTS: &[&str] = &["console", "file", "both"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
    pub units: UnitsConfig,
    pub analytics: AnalyticsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_file: PathBuf,
    pub log_directory: PathBuf,
}

/// Display units. The numbers themselves are unit-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub currency_symbol: String,
    pub volume_unit: String,
    pub distance_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub recent_log_count: usize,
    pub monthly_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_pretty: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fuel-log")
                .join("fuel_log.json"),
            log_directory: PathBuf::from("logs"),
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            volume_unit: "L".to_string(),
            distance_unit: "km".to_string(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recent_log_count: 5,
            monthly_limit: 12,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json_pretty: true }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("fuel-log.toml"),
            PathBuf::from(".fuel-log.toml"),
            dirs::config_dir()
                .map(|d| d.join("fuel-log").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        if let Ok(val) = env::var("FUEL_LOG_DATA_FILE") {
            self.paths.data_file = PathBuf::from(val);
        }
        if let Ok(val) = env::var("FUEL_LOG_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        if let Ok(val) = env::var("FUEL_LOG_CURRENCY") {
            self.units.currency_symbol = val;
        }
        if let Ok(val) = env::var("FUEL_LOG_VOLUME_UNIT") {
            self.units.volume_unit = val;
        }
        if let Ok(val) = env::var("FUEL_LOG_DISTANCE_UNIT") {
            self.units.distance_unit = val;
        }

        if let Ok(val) = env::var("FUEL_LOG_RECENT_COUNT") {
            self.analytics.recent_log_count =
                val.parse().context("Invalid FUEL_LOG_RECENT_COUNT")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Log format must be one of {:?}, got {:?}",
                LOG_FORMATS,
                self.logging.format
            );
        }
        if !LOG_OUTPUTS.contains(&self.logging.output.as_str()) {
            anyhow::bail!(
                "Log output must be one of {:?}, got {:?}",
                LOG_OUTPUTS,
                self.logging.output
            );
        }

        if self.analytics.recent_log_count == 0 {
            anyhow::bail!("Recent log count must be greater than 0");
        }
        if self.analytics.monthly_limit == 0 {
            anyhow::bail!("Monthly limit must be greater than 0");
        }

        if self.units.volume_unit.trim().is_empty() || self.units.distance_unit.trim().is_empty() {
            anyhow::bail!("Volume and distance units cannot be empty");
        }

        if self.paths.data_file.as_os_str().is_empty() {
            anyhow::bail!("Data file path cannot be empty");
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration. Later calls return the first value.
pub fn init_config() -> Result<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::load()?;
    Ok(CONFIG.get_or_init(|| config))
}
