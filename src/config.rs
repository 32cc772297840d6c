//! Application configuration loaded from TOML.

use crate::payment::{DEFAULT_ENTRY_FEE_USD, DEFAULT_FALLBACK_NATIVE_USD_PRICE};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`AppConfig::price_api_url`].
pub const PRICE_API_URL_ENV: &str = "PAIDPLAY_PRICE_API_URL";

/// Settings for the payment boundary and the computer's pacing.
///
/// Difficulty is fixed in the engine and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fee per round in USD.
    entry_fee_usd: f64,

    /// USD per native unit when the price feed fails.
    fallback_native_usd_price: f64,

    /// Pause before the computer moves, in milliseconds.
    thinking_delay_ms: u64,

    /// Base URL of the price API.
    price_api_url: String,

    /// Coin id of the native token at the price API.
    price_coin_id: String,

    /// Game contract receiving the payable `startGame()` call.
    contract_address: String,

    /// Chain the contract lives on.
    chain: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            entry_fee_usd: DEFAULT_ENTRY_FEE_USD,
            fallback_native_usd_price: DEFAULT_FALLBACK_NATIVE_USD_PRICE,
            thinking_delay_ms: 500,
            price_api_url: "https://api.coingecko.com/api/v3".to_string(),
            price_coin_id: "ethereum".to_string(),
            contract_address: "0x621d9D991b3971bE088d2FC8b6A585eF142411F3".to_string(),
            chain: "base".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(chain = %config.chain, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies environment overrides.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(PRICE_API_URL_ENV) {
            debug!(url = %url, "Price API URL overridden from environment");
            self.price_api_url = url;
        }
        self
    }

    /// Thinking delay as a [`Duration`].
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.entry_fee_usd.is_finite() && self.entry_fee_usd > 0.0) {
            return Err(ConfigError::new(format!(
                "entry_fee_usd must be positive, got {}",
                self.entry_fee_usd
            )));
        }
        if !(self.fallback_native_usd_price.is_finite() && self.fallback_native_usd_price > 0.0) {
            return Err(ConfigError::new(format!(
                "fallback_native_usd_price must be positive, got {}",
                self.fallback_native_usd_price
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml("thinking_delay_ms = 50\n").unwrap();
        assert_eq!(*config.thinking_delay_ms(), 50);
        assert_eq!(*config.entry_fee_usd(), DEFAULT_ENTRY_FEE_USD);
        assert_eq!(config.price_coin_id(), "ethereum");
        assert_eq!(config.thinking_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_rejects_non_positive_fee() {
        let err = AppConfig::from_toml("entry_fee_usd = 0.0\n").unwrap_err();
        assert!(err.message.contains("entry_fee_usd"));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = AppConfig::from_toml("thinking_delay_ms = \"soon\"").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }
}
