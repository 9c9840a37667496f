//! Order Transport

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::orders::{OrderPayload, OrderResponse};

/// Errors that can occur while sending an order.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("order endpoint returned status {0}")]
    Status(u16),
}

/// Carries an order payload to the backend.
#[automock]
#[async_trait]
pub trait OrderTransport: Send + Sync {
    /// Send the payload once and return the backend's answer.
    async fn send(&self, payload: &OrderPayload) -> Result<OrderResponse, TransportError>;
}

/// Posts orders as JSON to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpOrderTransport {
    http: Client,
    url: String,
}

impl HttpOrderTransport {
    /// Create a transport posting to `url`.
    #[must_use]
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Endpoint the orders are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OrderTransport for HttpOrderTransport {
    #[tracing::instrument(name = "orders.send", skip_all, fields(order_number = payload.order_number))]
    async fn send(&self, payload: &OrderPayload) -> Result<OrderResponse, TransportError> {
        let response = self.http.post(&self.url).json(payload).send().await?;

        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let parsed: OrderResponse = response.json().await?;

        debug!(success = parsed.success, "order endpoint answered");

        Ok(parsed)
    }
}
