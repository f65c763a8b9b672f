//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TallyConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Accounting configuration.
    #[serde(default)]
    pub accounting: AccountingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Accounting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountingConfig {
    /// ISO 4217 code of the ledger base currency.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Decimal scale used for base-currency amounts.
    #[serde(default = "default_base_scale")]
    pub base_scale: u32,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            base_scale: default_base_scale(),
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_base_scale() -> u32 {
    8
}

impl TallyConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
