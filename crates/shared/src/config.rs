//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::OfficeCurrencies;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Accounting engine connection.
    pub engine: EngineConfig,
    /// Desk display and quoting defaults.
    #[serde(default)]
    pub desk: DeskConfig,
}

/// Accounting engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine REST API (e.g. `https://engine.example.com`).
    pub base_url: String,
    /// Bearer token forwarded on every request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Desk configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Decimal places used when rounding amounts for display.
    #[serde(default = "default_display_decimals")]
    pub display_decimals: u32,
    /// Daily rate used when the office has not posted one yet.
    #[serde(default)]
    pub default_daily_rate: Option<Decimal>,
    /// Office currency table; its main entry carries the posted daily rate.
    #[serde(default)]
    pub currencies: Option<OfficeCurrencies>,
}

impl DeskConfig {
    /// Daily rate to quote with: the office's posted rate, else the fallback.
    #[must_use]
    pub fn daily_rate(&self) -> Option<Decimal> {
        self.currencies
            .as_ref()
            .map(OfficeCurrencies::daily_rate)
            .or(self.default_daily_rate)
    }
}

fn default_display_decimals() -> u32 {
    2
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            display_decimals: default_display_decimals(),
            default_daily_rate: None,
            currencies: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// then `FXDESK_*` environment variables (`__` separates nested keys, e.g.
    /// `FXDESK_ENGINE__BASE_URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FXDESK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}
