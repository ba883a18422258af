//! Persistent CLI Configuration Loader
//!
//! Configuration is loaded from `~/.config/zakat/config.toml` on Linux,
//! `~/Library/Application Support/zakat/config.toml` on macOS
//! or `%APPDATA%\zakat\config.toml` on Windows.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};
use zakat_engine::NisabStandard;

/// CLI configuration loaded from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Gold price per gram used when none is given on the command line.
    pub gold_price: Option<Decimal>,
    /// Silver price per gram used when none is given on the command line.
    pub silver_price: Option<Decimal>,
    /// Currency the live feed quotes in (e.g. "EUR", "USD").
    pub currency: Option<String>,
    /// "gold" or "silver".
    pub nisab_standard: Option<String>,
    pub zakat_rate: Option<Decimal>,
    /// goldapi.io access token.
    pub api_key: Option<String>,
    /// Never contact the price feed.
    pub offline: Option<bool>,
}

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zakat"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads the config file from its default location.
    /// Returns `CliConfig::default()` if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// The configured Nisab standard, if it names a known one.
    pub fn nisab_standard(&self) -> Option<NisabStandard> {
        let raw = self.nisab_standard.as_deref()?;
        match NisabStandard::from_str(raw.trim()) {
            Ok(standard) => Some(standard),
            Err(_) => {
                warn!("Ignoring unknown nisab-standard {:?} in config file", raw);
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)?;
        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn sample() -> Self {
        CliConfig {
            gold_price: Some(dec!(60.00)),
            silver_price: Some(dec!(0.70)),
            currency: Some("EUR".to_string()),
            nisab_standard: Some("gold".to_string()),
            zakat_rate: Some(dec!(0.025)),
            api_key: None,
            offline: Some(false),
        }
    }

    /// Writes a sample config file to the default location and returns its path.
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn create_sample(force: bool) -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        if path.exists() && !force {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists (use --force to overwrite)", path.display()),
            ));
        }

        Self::sample().save_to(&path)?;
        Ok(path)
    }
}
