//! Orders Config

use std::time::Duration;

use clap::Args;
use reqwest::Client;

/// Order submission settings.
#[derive(Debug, Args)]
pub struct OrdersConfig {
    /// URL orders are posted to
    #[arg(long, env = "KIOSK_ORDER_URL", default_value = "http://localhost:8080/orders")]
    pub order_url: String,

    /// Timeout for catalog and order requests, in seconds
    #[arg(long, env = "KIOSK_REQUEST_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub request_timeout_seconds: u64,
}

impl OrdersConfig {
    /// Build the HTTP client used for catalog and order requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend can't be initialised.
    pub fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_seconds))
            .build()
    }
}
