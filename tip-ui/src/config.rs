//! User configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tip_core::CalculatorSettings;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for formatted money.
    pub currency_symbol: String,
    /// Tip percentage before a country is chosen.
    pub default_tip_percent: Decimal,
    /// Digit ceiling for the bill entry (8 to 10).
    pub max_entry_digits: usize,
    /// Country CSV replacing the bundled table.
    pub countries_file: Option<PathBuf>,
    /// Upper bound for time zone detection.
    pub detect_timeout_ms: u64,
    /// `EnvFilter` directive, e.g. `warn` or `tip_core=debug`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = CalculatorSettings::default();
        Self {
            currency_symbol: settings.currency_symbol,
            default_tip_percent: settings.default_tip_percent,
            max_entry_digits: settings.max_entry_digits,
            countries_file: None,
            detect_timeout_ms: 3000,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn calculator_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            currency_symbol: self.currency_symbol.clone(),
            default_tip_percent: self.default_tip_percent,
            max_entry_digits: self.max_entry_digits,
        }
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }
}

/// Default location: `<config dir>/tiptime/config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiptime")
        .join("config.toml")
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).with_context(|| "Failed to parse config file")
}

/// Loads `path`, or the default location when `None`.
///
/// A missing file at the default location yields defaults; an explicitly
/// named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };
    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}
