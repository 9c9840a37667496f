//! Kiosk configuration

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::config::{
    catalog::CatalogConfig, logging::LoggingConfig, orders::OrdersConfig, storage::StorageConfig,
};

pub mod catalog;
pub mod logging;
pub mod orders;
pub mod storage;

pub use catalog::CatalogSource;
pub use logging::LogFormat;

/// Errors raised while resolving configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code isn't a known ISO 4217 code.
    #[error("unknown currency code `{0}`")]
    UnknownCurrency(String),

    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Kiosk configuration, from CLI arguments and the environment.
#[derive(Debug, Args)]
pub struct KioskConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Catalog source settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Order submission settings.
    #[command(flatten)]
    pub orders: OrdersConfig,

    /// ISO 4217 code of the currency totals are shown in
    #[arg(long, env = "KIOSK_CURRENCY", default_value = "EUR")]
    pub currency: String,
}

impl KioskConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code isn't recognised.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_ascii_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        config: KioskConfig,
    }

    #[test]
    fn explicit_arguments_are_used() -> TestResult {
        let harness = Harness::try_parse_from([
            "kiosk",
            "--storage-dir",
            "/tmp/kiosk-state",
            "--catalog-url",
            "https://example.test/data",
            "--order-url",
            "https://example.test/orders",
            "--currency",
            "gbp",
            "--log-format",
            "json",
        ])?;

        let config = harness.config;

        assert_eq!(config.storage.storage_dir.to_str(), Some("/tmp/kiosk-state"));
        assert_eq!(
            config.catalog.source(),
            CatalogSource::Url("https://example.test/data")
        );
        assert_eq!(config.orders.order_url, "https://example.test/orders");
        assert_eq!(config.currency()?, iso::GBP);
        assert_eq!(config.logging.format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_an_error() -> TestResult {
        let harness = Harness::try_parse_from(["kiosk", "--currency", "XYZ1"])?;

        assert!(matches!(
            harness.config.currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ1"
        ));

        Ok(())
    }
}
