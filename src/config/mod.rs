use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    currency::{
        render_grand_total, ExchangeRates, Rendered, DEFAULT_BASE_CURRENCY, DEFAULT_KHR_PER_USD,
    },
    errors::ConfigError,
    storage::DEFAULT_PREFIX,
    utils::{
        fs::write_atomic,
        paths::{app_data_dir, config_file_in, ensure_dir, store_file_in},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub storage_prefix: String,
    pub base_currency: String,
    pub khr_per_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_PREFIX.into(),
            base_currency: DEFAULT_BASE_CURRENCY.into(),
            khr_per_usd: DEFAULT_KHR_PER_USD,
            data_dir: None,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_prefix.is_empty() {
            return Err(ConfigError::Invalid("storage_prefix must not be empty".into()));
        }
        if self.base_currency.is_empty()
            || !self.base_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ConfigError::Invalid(format!(
                "base_currency `{}` is not an alphabetic code",
                self.base_currency
            )));
        }
        if !self.khr_per_usd.is_finite() || self.khr_per_usd <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "khr_per_usd must be a positive number, got {}",
                self.khr_per_usd
            )));
        }
        Ok(())
    }

    pub fn exchange_rates(&self) -> ExchangeRates {
        ExchangeRates::usd_khr(self.khr_per_usd)
    }

    /// Totals two monetary strings in the configured base currency at the
    /// configured rate.
    pub fn grand_total(&self, value1: &str, value2: &str) -> Rendered {
        render_grand_total(value1, value2, &self.base_currency, &self.exchange_rates())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }

    pub fn store_file(&self) -> PathBuf {
        store_file_in(&self.data_dir())
    }
}

/// Loads and saves [`ReportConfig`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<ReportConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(ReportConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: ReportConfig =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        info!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &ReportConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}
