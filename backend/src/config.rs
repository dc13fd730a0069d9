//! Configuration management for the ChemStock backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CHEMSTOCK_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::LedgerPolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Ledger policy flags
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

/// Ledger policy configuration.
///
/// Materialized into a [`LedgerPolicy`] value and passed explicitly into
/// the services; nothing reads these flags ambiently.
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Allow invoice issuance to drive global stock negative
    pub allow_negative_stock: bool,

    /// Flat tax rate in percent
    pub tax_rate: Decimal,

    /// Round invoice grand totals to a whole amount
    pub round_off: bool,

    /// Accept caller-supplied invoice numbers
    pub manual_invoice_no: bool,

    /// Default low-stock threshold for new products
    pub low_stock_threshold: Decimal,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CHEMSTOCK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("ledger.allow_negative_stock", false)?
            .set_default("ledger.tax_rate", "18")?
            .set_default("ledger.round_off", true)?
            .set_default("ledger.manual_invoice_no", true)?
            .set_default("ledger.low_stock_threshold", "10")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CHEMSTOCK_ prefix)
            .add_source(
                Environment::with_prefix("CHEMSTOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// The explicit policy value handed to the ledger services.
    pub fn ledger_policy(&self) -> LedgerPolicy {
        LedgerPolicy {
            allow_negative_stock: self.ledger.allow_negative_stock,
            tax_rate: self.ledger.tax_rate,
            round_off: self.ledger.round_off,
            manual_invoice_no: self.ledger.manual_invoice_no,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
