//! List endpoint client.

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::item::{Item, ListResponse};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("could not decode list response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin wrapper around a `reqwest::Client` bound to one endpoint.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    client: Client,
    endpoint: String,
}

impl ItemsClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("cards/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET, no retry. Non-2xx responses are errors.
    pub async fn fetch_items(&self) -> Result<Vec<Item>, FetchError> {
        info!("[fetch] GET {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("[fetch] {} bytes from {}", body.len(), self.endpoint);
        parse_items(&body)
    }
}

/// Decode the list envelope and return its `data`.
pub fn parse_items(body: &str) -> Result<Vec<Item>, FetchError> {
    let response: ListResponse = serde_json::from_str(body)?;
    Ok(response.data)
}
