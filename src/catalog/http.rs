//! HTTP implementation of the catalog client.
//!
//! Talks JSON to `GET {base}/products` and `GET {base}/products/{id}` with a
//! bounded per-request timeout. The upstream serializes PascalCase field
//! names; serde aliases make the decode case-tolerant.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{CatalogError, ProductCatalogClient};
use crate::model::{ProductId, ProductRecord};

/// Default bound on any single catalog round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the upstream catalog, passed in explicitly
/// rather than read from ambient state.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wire shape of an upstream product. `last_synced_at` is not on the wire;
/// it is stamped locally at decode time.
#[derive(Debug, Deserialize)]
struct ProductDto {
    #[serde(alias = "Id")]
    id: ProductId,
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Price")]
    price: Decimal,
}

impl ProductDto {
    fn into_record(self, synced_at: DateTime<Utc>) -> ProductRecord {
        ProductRecord {
            id: self.id,
            name: self.name,
            price: self.price,
            last_synced_at: synced_at,
        }
    }
}

/// Production [`ProductCatalogClient`] backed by `reqwest`.
pub struct HttpCatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CatalogError> {
        self.http.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "Catalog request failed");
            CatalogError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl ProductCatalogClient for HttpCatalogClient {
    async fn fetch_by_id(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError> {
        let url = format!("{}/{}", self.products_url(), id);
        let response = self.get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(%id, "Product not found upstream");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "unexpected status {} from {url}",
                response.status()
            )));
        }

        let dto: ProductDto = response
            .json()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Some(dto.into_record(Utc::now())))
    }

    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let url = self.products_url();
        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "unexpected status {} from {url}",
                response.status()
            )));
        }

        let dtos: Vec<ProductDto> = response
            .json()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        let synced_at = Utc::now();
        debug!(count = dtos.len(), "Fetched upstream product set");
        Ok(dtos.into_iter().map(|d| d.into_record(synced_at)).collect())
    }

    async fn probe(&self) -> bool {
        match self.get(&self.products_url()).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
