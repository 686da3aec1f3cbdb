//! Outbound adapter for the upstream product-catalog service.
//!
//! The rest of the engine works against the [`ProductCatalogClient`] trait,
//! never against a concrete transport. [`HttpCatalogClient`] is the
//! production implementation; [`fake`] provides in-memory doubles so the
//! pricing and synchronization logic can be tested without a network stack.

pub mod error;
pub mod fake;
pub mod http;

pub use error::CatalogError;
pub use fake::{FailingCatalogClient, FakeCatalogClient};
pub use http::{CatalogConfig, HttpCatalogClient};

use async_trait::async_trait;

use crate::model::{ProductId, ProductRecord};

/// Capability-shaped client for the upstream catalog.
///
/// Every call is a bounded network round trip. Ordinary absence is a typed
/// outcome (`Ok(None)`), not an error; transport failures of any shape are
/// normalized to [`CatalogError::Unavailable`]. The client performs no
/// retries — callers decide whether staleness is acceptable.
#[async_trait]
pub trait ProductCatalogClient: Send + Sync {
    /// Fetch a single product by its upstream id.
    async fn fetch_by_id(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError>;

    /// Fetch the full upstream product set.
    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, CatalogError>;

    /// Health probe. Never fails; an unreachable upstream is `false`.
    async fn probe(&self) -> bool;
}
