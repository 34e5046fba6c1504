//! Configuration Module
//!
//! This module defines all configuration structures for the payout builder.
//! Configuration is loaded from an optional TOML file and parsed using serde.
//! Every field has a default, so an empty file (or no file at all) is valid.

use crate::error::PayoutError;
use crate::stellar::{AccountId, Asset};
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Issuer of the TFT asset on the public network
pub const TFT_ISSUER: &str = "GBOVQKJYHXRR3DX6NOX2RRYFRCUMSADGDESTDNBDS6CDVLGVESRTAC47";
pub const TFT_ASSET_CODE: &str = "TFT";

/// Largest page Horizon will serve
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [ledger]
/// horizon_url = "https://horizon.stellar.org"
/// page_limit = 200
/// retry_backoff_ms = 1000
/// max_retries = 30
///
/// [asset]
/// code = "TFT"
/// issuer = "GBOVQKJYHXRR3DX6NOX2RRYFRCUMSADGDESTDNBDS6CDVLGVESRTAC47"
///
/// [transaction]
/// base_fee = 1000000
/// validity_secs = 518400
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub asset: AssetConfig,
    pub transaction: TransactionConfig,
}

/// Horizon connection configuration
///
/// # Fields
/// - `horizon_url`: Base URL of the Horizon server
/// - `page_limit`: Records requested per history page (1..=200)
/// - `retry_backoff_ms`: Fixed sleep between retries of a 5xx response
/// - `max_retries`: Retries per request before giving up; unset retries forever
/// - `request_timeout_secs`: Per-request HTTP timeout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub horizon_url: String,
    pub page_limit: u32,
    pub retry_backoff_ms: u64,
    pub max_retries: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            horizon_url: "https://horizon.stellar.org".to_string(),
            page_limit: MAX_PAGE_LIMIT,
            retry_backoff_ms: 1000,
            max_retries: None,
            request_timeout_secs: 30,
        }
    }
}

/// The asset being paid out. The issuer is also the source of every payout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub code: String,
    pub issuer: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            code: TFT_ASSET_CODE.to_string(),
            issuer: TFT_ISSUER.to_string(),
        }
    }
}

/// Transaction envelope parameters
///
/// # Fields
/// - `base_fee`: Fee per operation, in stroops (1_000_000 = 0.1 XLM)
/// - `validity_secs`: How long after construction a transaction stays submittable
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    pub base_fee: u32,
    pub validity_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            base_fee: 1_000_000,
            validity_secs: 60 * 60 * 24 * 6,
        }
    }
}

impl LedgerConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject configurations that could only produce invalid transactions
    pub fn validate(&self) -> Result<(), PayoutError> {
        if self.ledger.page_limit == 0 || self.ledger.page_limit > MAX_PAGE_LIMIT {
            return Err(PayoutError::Config(format!(
                "page_limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.ledger.page_limit
            )));
        }
        if self.transaction.base_fee == 0 {
            return Err(PayoutError::Config("base_fee must be positive".to_string()));
        }
        if self.transaction.validity_secs == 0 {
            return Err(PayoutError::Config("validity_secs must be positive".to_string()));
        }
        self.asset()?;
        Ok(())
    }

    /// Issuing account, parsed
    pub fn issuer(&self) -> Result<AccountId, PayoutError> {
        self.asset.issuer.parse().map_err(|_| {
            PayoutError::Config(format!("invalid issuer account {}", self.asset.issuer))
        })
    }

    /// Payout asset, parsed
    pub fn asset(&self) -> Result<Asset, PayoutError> {
        let issuer = self.issuer()?;
        Asset::credit(&self.asset.code, issuer).map_err(|e| PayoutError::Config(e.to_string()))
    }
}

/// Validate the operator-supplied starting sequence number
///
/// Zero means "not provided"; sequence numbers on the ledger are positive.
pub fn starting_sequence(value: i64) -> Result<i64, PayoutError> {
    if value <= 0 {
        return Err(PayoutError::MissingSequence);
    }
    Ok(value)
}

/// Log filter from the value of `RUST_LOG`, defaulting to `info`
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ledger.page_limit, 200);
        assert_eq!(config.ledger.retry_backoff_ms, 1000);
        assert_eq!(config.ledger.max_retries, None);
        assert_eq!(config.asset.code, "TFT");
        assert_eq!(config.asset.issuer, TFT_ISSUER);
        assert_eq!(config.transaction.base_fee, 1_000_000);
        assert_eq!(config.transaction.validity_secs, 518_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_shipped_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.ledger.horizon_url, "https://horizon.stellar.org");
        assert_eq!(config.asset.issuer, TFT_ISSUER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [ledger]
            horizon_url = "https://horizon-testnet.stellar.org"
            max_retries = 5

            [transaction]
            validity_secs = 3600
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger.horizon_url, "https://horizon-testnet.stellar.org");
        assert_eq!(config.ledger.max_retries, Some(5));
        assert_eq!(config.ledger.page_limit, 200);
        assert_eq!(config.transaction.validity_secs, 3600);
        assert_eq!(config.transaction.base_fee, 1_000_000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.ledger.page_limit = 201;
        assert!(matches!(config.validate(), Err(PayoutError::Config(_))));

        let mut config = Config::default();
        config.transaction.base_fee = 0;
        assert!(matches!(config.validate(), Err(PayoutError::Config(_))));

        let mut config = Config::default();
        config.asset.issuer = "GNOTANACCOUNT".to_string();
        assert!(matches!(config.validate(), Err(PayoutError::Config(_))));

        let mut config = Config::default();
        config.asset.code = "TOOLONGASSETCODE".to_string();
        assert!(matches!(config.validate(), Err(PayoutError::Config(_))));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        use tracing::level_filters::LevelFilter;

        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("payout_builder=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_starting_sequence_is_required() {
        assert!(matches!(starting_sequence(0), Err(PayoutError::MissingSequence)));
        assert!(matches!(starting_sequence(-3), Err(PayoutError::MissingSequence)));
        assert_eq!(starting_sequence(5).unwrap(), 5);
    }
}
