//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Polymarket Credentials ===
    /// CLOB API key. Required; the bot refuses to start without it.
    pub polymarket_api_key: String,

    /// Optional API secret.
    #[serde(default)]
    pub polymarket_api_secret: Option<String>,

    /// Optional API passphrase.
    #[serde(default)]
    pub polymarket_api_passphrase: Option<String>,

    /// Proxy wallet address funding the orders.
    #[serde(default)]
    pub polymarket_funder: Option<String>,

    // === Exchange ===
    /// CLOB API base URL.
    #[serde(default = "default_clob_url")]
    pub polymarket_clob_url: String,

    /// Chain ID (137 for Polygon).
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    // === Trading Parameters ===
    /// Maximum combined yes+no cost that still counts as an opportunity.
    #[serde(default = "default_arb_threshold")]
    pub arb_threshold: Decimal,

    /// Number of shares bought on each leg.
    #[serde(default = "default_shares_per_trade")]
    pub shares_per_trade: Decimal,

    /// Haircut subtracted from the edge when booking profit, so the
    /// ledger never overstates what settlement pays out after fees.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,

    // === Scan Loop ===
    /// Seconds to sleep between scan ticks.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Refresh the market catalog every N scans.
    #[serde(default = "default_refresh_cadence")]
    pub refresh_every_scans: u64,

    /// Keywords a market question must ALL contain (case-insensitive)
    /// to be admitted to the catalog. Comma-separated in the environment.
    #[serde(default = "default_keywords")]
    pub market_keywords: Vec<String>,

    // === Capital Allocation ===
    /// Percent of capital reserved for the pure two-sided strategy.
    #[serde(default = "default_pure_percent")]
    pub arb_pure_percent: u32,

    /// Percent reserved for directional lag bets. Must bring the total
    /// to exactly 100 together with `arb_pure_percent`.
    #[serde(default = "default_lag_percent")]
    pub arb_lag_percent: u32,

    // === Reporting ===
    /// Discord webhook URL for daily summaries. Reports are skipped
    /// (with a log line) when unset.
    #[serde(default)]
    pub discord_webhook_url: Option<String>,

    // === HTTP Client ===
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connection pool size per host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Metrics ===
    /// Enable the Prometheus exporter.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Prometheus exporter port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_chain_id() -> u64 {
    137 // Polygon mainnet
}

fn default_arb_threshold() -> Decimal {
    Decimal::new(98, 2) // 0.98
}

fn default_shares_per_trade() -> Decimal {
    Decimal::new(25, 0) // 25 shares per leg
}

fn default_fee_rate() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_scan_interval() -> u64 {
    2
}

fn default_refresh_cadence() -> u64 {
    50
}

fn default_keywords() -> Vec<String> {
    vec!["bitcoin".to_string(), "15 minute".to_string()]
}

fn default_pure_percent() -> u32 {
    75
}

fn default_lag_percent() -> u32 {
    25
}

fn default_http_timeout_ms() -> u64 {
    2000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.polymarket_api_key.is_empty() {
            return Err("POLYMARKET_API_KEY is required".to_string());
        }

        if self.arb_threshold <= Decimal::ZERO || self.arb_threshold >= Decimal::ONE {
            return Err("ARB_THRESHOLD must be between 0 and 1 exclusive".to_string());
        }

        if self.shares_per_trade <= Decimal::ZERO {
            return Err("SHARES_PER_TRADE must be positive".to_string());
        }

        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err("FEE_RATE must be in [0, 1)".to_string());
        }

        if self.arb_pure_percent + self.arb_lag_percent != 100 {
            return Err(format!(
                "ARB_PURE_PERCENT ({}) + ARB_LAG_PERCENT ({}) must equal 100",
                self.arb_pure_percent, self.arb_lag_percent
            ));
        }

        if self.refresh_every_scans == 0 {
            return Err("REFRESH_EVERY_SCANS must be at least 1".to_string());
        }

        if self.market_keywords.is_empty() {
            return Err("MARKET_KEYWORDS must contain at least one keyword".to_string());
        }

        Ok(())
    }
}

/// Baseline configuration for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        polymarket_api_key: "test-key".to_string(),
        polymarket_api_secret: None,
        polymarket_api_passphrase: None,
        polymarket_funder: None,
        polymarket_clob_url: default_clob_url(),
        chain_id: default_chain_id(),
        arb_threshold: default_arb_threshold(),
        shares_per_trade: default_shares_per_trade(),
        fee_rate: default_fee_rate(),
        scan_interval_secs: default_scan_interval(),
        refresh_every_scans: default_refresh_cadence(),
        market_keywords: default_keywords(),
        arb_pure_percent: default_pure_percent(),
        arb_lag_percent: default_lag_percent(),
        discord_webhook_url: None,
        http_timeout_ms: default_http_timeout_ms(),
        http_pool_size: default_http_pool_size(),
        metrics_enabled: true,
        metrics_port: default_metrics_port(),
        rust_log: default_log_level(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_arb_threshold(), dec!(0.98));
        assert_eq!(default_shares_per_trade(), dec!(25));
        assert_eq!(default_fee_rate(), dec!(0.02));
        assert_eq!(default_scan_interval(), 2);
        assert_eq!(default_refresh_cadence(), 50);
        assert_eq!(default_pure_percent() + default_lag_percent(), 100);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        let mut config = test_config();
        config.polymarket_api_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_allocation_not_summing_to_100() {
        let mut config = test_config();
        config.arb_pure_percent = 80;
        config.arb_lag_percent = 25;
        let err = config.validate().unwrap_err();
        assert!(err.contains("must equal 100"));
    }

    #[test]
    fn validate_rejects_threshold_of_one_or_more() {
        let mut config = test_config();
        config.arb_threshold = dec!(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_refresh_cadence() {
        let mut config = test_config();
        config.refresh_every_scans = 0;
        assert!(config.validate().is_err());
    }
}
