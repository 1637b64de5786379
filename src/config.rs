//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::state::{DEFAULT_FALLBACK_CITY, DEFAULT_FORECAST_DAYS};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("no WeatherAPI key: set WEATHER_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("--fallback-city must not be blank")]
    BlankFallbackCity,
    #[error("could not determine a data directory; pass --storage-path")]
    NoDataDir,
}

/// Options shared by the binary, flattened into its parser
#[derive(clap::Args, Debug, Clone)]
pub struct CliConfig {
    /// WeatherAPI.com key
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the WeatherAPI.com v1 endpoints
    #[arg(long, env = "CITYCAST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// City shown when no city has been remembered yet
    #[arg(long, env = "CITYCAST_FALLBACK_CITY", default_value = DEFAULT_FALLBACK_CITY)]
    pub fallback_city: String,

    /// Forecast days to request (1-14)
    #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS, value_parser = clap::value_parser!(u8).range(1..=14))]
    pub days: u8,

    /// Refresh interval in seconds (minimum 60)
    #[arg(long, short, default_value = "600", value_parser = clap::value_parser!(u64).range(60..))]
    pub refresh_interval: u64,

    /// Where the remembered city is stored
    #[arg(long, env = "CITYCAST_STORAGE")]
    pub storage_path: Option<PathBuf>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, env = "CITYCAST_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub fallback_city: String,
    pub forecast_days: u8,
    pub refresh_interval: Duration,
    pub storage_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl CliConfig {
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let fallback_city = self.fallback_city.trim().to_string();
        if fallback_city.is_empty() {
            return Err(ConfigError::BlankFallbackCity);
        }

        let storage_path = match self.storage_path {
            Some(path) => path,
            None => default_storage_path().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Config {
            api_key,
            base_url: self.base_url,
            fallback_city,
            forecast_days: self.days,
            refresh_interval: Duration::from_secs(self.refresh_interval),
            storage_path,
            log_file: self.log_file,
        })
    }
}

pub fn default_storage_path() -> Option<PathBuf> {
    dirs_next::data_local_dir().map(|dir| dir.join("citycast").join("storage.json"))
}
