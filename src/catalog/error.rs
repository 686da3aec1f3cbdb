//! Error type for the catalog client boundary.

use thiserror::Error;

/// Errors surfaced by a [`ProductCatalogClient`](super::ProductCatalogClient).
///
/// Timeouts, refused connections, TLS failures, unexpected status codes and
/// undecodable bodies all collapse into `Unavailable`; callers never see raw
/// transport errors. Absence of a product is not an error at all — it is
/// `Ok(None)` on the fetch path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
