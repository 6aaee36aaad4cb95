//! Thin REST client for the shop API.

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Product as listed by `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let products = self
            .client
            .get(self.url("/api/products"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(products)
    }

    /// Succeeds on any 2xx from the liveness probe; the body is not inspected.
    pub async fn health(&self) -> Result<(), ApiError> {
        self.client
            .get(self.url("/health"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
