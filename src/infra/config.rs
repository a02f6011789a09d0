//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/default.toml
//!
//! A missing or unreadable file falls back to the built-in defaults, which
//! reproduce the classic run: 100 customers, 5 cashiers, baskets of 1-4
//! items and 1-4 second service times.

use crate::domain::types::Product;
use crate::infra::error::CheckoutError;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_customer_count")]
    pub customer_count: usize,
    #[serde(default = "default_cashier_count")]
    pub cashier_count: usize,
    #[serde(default = "default_min_basket_size")]
    pub min_basket_size: usize,
    #[serde(default = "default_max_basket_size")]
    pub max_basket_size: usize,
    #[serde(default = "default_min_service_units")]
    pub min_service_units: u64,
    #[serde(default = "default_max_service_units")]
    pub max_service_units: u64,
    /// Length of one service time unit in milliseconds
    #[serde(default = "default_service_unit_ms")]
    pub service_unit_ms: u64,
    /// Seed for reproducible runs (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of transactions shown in the summary
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_print_receipts")]
    pub print_receipts: bool,
    /// Upper bound on the drain phase (unbounded when absent)
    #[serde(default)]
    pub drain_timeout_secs: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            customer_count: default_customer_count(),
            cashier_count: default_cashier_count(),
            min_basket_size: default_min_basket_size(),
            max_basket_size: default_max_basket_size(),
            min_service_units: default_min_service_units(),
            max_service_units: default_max_service_units(),
            service_unit_ms: default_service_unit_ms(),
            seed: None,
            sample_size: default_sample_size(),
            print_receipts: default_print_receipts(),
            drain_timeout_secs: None,
        }
    }
}

fn default_customer_count() -> usize {
    100
}

fn default_cashier_count() -> usize {
    5
}

fn default_min_basket_size() -> usize {
    1
}

fn default_max_basket_size() -> usize {
    4
}

fn default_min_service_units() -> u64 {
    1
}

fn default_max_service_units() -> u64 {
    4
}

fn default_service_unit_ms() -> u64 {
    1000
}

fn default_sample_size() -> usize {
    5
}

fn default_print_receipts() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Replaces the built-in catalog when present
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    customer_count: usize,
    cashier_count: usize,
    min_basket_size: usize,
    max_basket_size: usize,
    min_service_units: u64,
    max_service_units: u64,
    service_unit_ms: u64,
    seed: Option<u64>,
    sample_size: usize,
    print_receipts: bool,
    drain_timeout_secs: Option<u64>,
    products: Option<Vec<Product>>,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        let sim = toml_config.simulation;
        Self {
            customer_count: sim.customer_count,
            cashier_count: sim.cashier_count,
            min_basket_size: sim.min_basket_size,
            max_basket_size: sim.max_basket_size,
            min_service_units: sim.min_service_units,
            max_service_units: sim.max_service_units,
            service_unit_ms: sim.service_unit_ms,
            seed: sim.seed,
            sample_size: sim.sample_size,
            print_receipts: sim.print_receipts,
            drain_timeout_secs: sim.drain_timeout_secs,
            products: toml_config.products,
            config_file,
        }
    }

    /// Determine config file path from the CLI value or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path, error = format!("{:#}", e), "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    /// Reject parameter combinations the simulation cannot run with
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.cashier_count == 0 {
            return Err(CheckoutError::InvalidConfig("cashier_count must be at least 1".into()));
        }
        if self.min_basket_size == 0 {
            return Err(CheckoutError::InvalidConfig("min_basket_size must be at least 1".into()));
        }
        if self.min_basket_size > self.max_basket_size {
            return Err(CheckoutError::InvalidConfig(format!(
                "basket size range {}..={} is empty",
                self.min_basket_size, self.max_basket_size
            )));
        }
        if self.min_service_units > self.max_service_units {
            return Err(CheckoutError::InvalidConfig(format!(
                "service time range {}..={} is empty",
                self.min_service_units, self.max_service_units
            )));
        }
        if let Some(products) = &self.products {
            if products.is_empty() && self.customer_count > 0 {
                return Err(CheckoutError::InvalidConfig(
                    "product catalog is empty but customers need baskets".into(),
                ));
            }
            if let Some(p) = products.iter().find(|p| p.price.is_sign_negative()) {
                return Err(CheckoutError::InvalidConfig(format!(
                    "product {} has a negative price",
                    p.name
                )));
            }
        }
        Ok(())
    }

    // Getters for all config fields
    pub fn customer_count(&self) -> usize {
        self.customer_count
    }

    pub fn cashier_count(&self) -> usize {
        self.cashier_count
    }

    pub fn min_basket_size(&self) -> usize {
        self.min_basket_size
    }

    pub fn max_basket_size(&self) -> usize {
        self.max_basket_size
    }

    pub fn min_service_units(&self) -> u64 {
        self.min_service_units
    }

    pub fn max_service_units(&self) -> u64 {
        self.max_service_units
    }

    pub fn service_unit(&self) -> Duration {
        Duration::from_millis(self.service_unit_ms)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn print_receipts(&self) -> bool {
        self.print_receipts
    }

    pub fn drain_timeout(&self) -> Option<Duration> {
        self.drain_timeout_secs.map(Duration::from_secs)
    }

    /// Catalog configured in the file, if any
    pub fn products(&self) -> Option<&[Product]> {
        self.products.as_deref()
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    // Builder methods for CLI overrides and tests
    pub fn with_customer_count(mut self, count: usize) -> Self {
        self.customer_count = count;
        self
    }

    pub fn with_cashier_count(mut self, count: usize) -> Self {
        self.cashier_count = count;
        self
    }

    pub fn with_service_units(mut self, min: u64, max: u64) -> Self {
        self.min_service_units = min;
        self.max_service_units = max;
        self
    }

    pub fn with_service_unit_ms(mut self, ms: u64) -> Self {
        self.service_unit_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_print_receipts(mut self, enabled: bool) -> Self {
        self.print_receipts = enabled;
        self
    }

    pub fn with_drain_timeout_secs(mut self, secs: u64) -> Self {
        self.drain_timeout_secs = Some(secs);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Some(products);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.customer_count(), 100);
        assert_eq!(config.cashier_count(), 5);
        assert_eq!(config.min_basket_size(), 1);
        assert_eq!(config.max_basket_size(), 4);
        assert_eq!(config.min_service_units(), 1);
        assert_eq!(config.max_service_units(), 4);
        assert_eq!(config.service_unit(), Duration::from_secs(1));
        assert_eq!(config.sample_size(), 5);
        assert!(config.print_receipts());
        assert!(config.seed().is_none());
        assert!(config.drain_timeout().is_none());
        assert!(config.products().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_config_path_from_cli() {
        assert_eq!(Config::resolve_config_path(Some("config/fast.toml")), "config/fast.toml");
    }

    #[test]
    fn test_validate_rejects_zero_cashiers() {
        let config = Config::default().with_cashier_count(0);
        assert!(matches!(config.validate(), Err(CheckoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_service_range() {
        let config = Config::default().with_service_units(4, 1);
        assert!(matches!(config.validate(), Err(CheckoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_empty_catalog() {
        let config = Config::default().with_products(Vec::new());
        assert!(config.validate().is_err());

        // No customers means no basket is ever drawn
        let config = Config::default().with_products(Vec::new()).with_customer_count(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_price() {
        let config = Config::default().with_products(vec![Product::new("Refund", Decimal::from(-1))]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[simulation]
customer_count = 12
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());
        assert_eq!(config.customer_count(), 12);
        assert_eq!(config.cashier_count(), 5);
        assert_eq!(config.max_service_units(), 4);
    }
}
