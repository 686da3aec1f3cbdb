//! Order pricing: quote, freeze, persist.
//!
//! The engine computes `total_price` exactly once per order state. The
//! replica serves the hot path; a direct upstream fetch is the fallback for
//! products not yet replicated. Historical totals are never recomputed from
//! later catalog prices — an explicit update is the one place the freeze is
//! intentionally broken, because the caller is requesting a new order state.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::{OrderChanges, OrderDraft, OrderStoreClient, OrderStoreError};
use crate::catalog::{CatalogError, ProductCatalogClient};
use crate::model::{Order, OrderId, PriceQuote, ProductId};
use crate::replica::{ReplicaStoreClient, ReplicaStoreError};

/// Errors surfaced by pricing operations, in the order they are checked:
/// input validation before any I/O, then lookup outcomes, then faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),
    #[error("product catalog unavailable: {0}")]
    Upstream(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<CatalogError> for PricingError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Unavailable(msg) => PricingError::Upstream(msg),
        }
    }
}

impl From<ReplicaStoreError> for PricingError {
    fn from(e: ReplicaStoreError) -> Self {
        PricingError::Storage(e.to_string())
    }
}

impl From<OrderStoreError> for PricingError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::NotFound(id) => PricingError::OrderNotFound(id),
            other => PricingError::Storage(other.to_string()),
        }
    }
}

/// Computes and freezes order totals at creation/modification time.
pub struct OrderPricingEngine {
    replica: ReplicaStoreClient,
    orders: OrderStoreClient,
    catalog: Arc<dyn ProductCatalogClient>,
}

impl OrderPricingEngine {
    pub fn new(
        replica: ReplicaStoreClient,
        orders: OrderStoreClient,
        catalog: Arc<dyn ProductCatalogClient>,
    ) -> Self {
        Self {
            replica,
            orders,
            catalog,
        }
    }

    /// Current unit price for a product: replica first (no network), then a
    /// direct upstream fetch for products not yet replicated.
    async fn unit_price(&self, product_id: ProductId) -> Result<Decimal, PricingError> {
        if let Some(record) = self.replica.get(product_id).await? {
            debug!(%product_id, price = %record.price, "Priced from replica");
            return Ok(record.price);
        }

        match self.catalog.fetch_by_id(product_id).await? {
            Some(record) => {
                debug!(%product_id, price = %record.price, "Priced from upstream");
                Ok(record.price)
            }
            None => {
                warn!(%product_id, "Product unknown to replica and upstream");
                Err(PricingError::ProductNotFound(product_id))
            }
        }
    }

    /// Price a `(product, quantity)` pair without persisting anything.
    /// Zero quantity is rejected before any storage or network access.
    pub async fn quote(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<PriceQuote, PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }
        let unit_price = self.unit_price(product_id).await?;
        Ok(PriceQuote {
            unit_price,
            total_price: unit_price * Decimal::from(quantity),
        })
    }

    /// Quote and persist a new order. The quoted total is stored verbatim
    /// and never re-derived.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Order, PricingError> {
        let quote = self.quote(product_id, quantity).await?;
        let order = self
            .orders
            .create(OrderDraft {
                product_id: Some(product_id),
                quantity,
                total_price: quote.total_price,
                order_date: Utc::now(),
            })
            .await?;
        Ok(order)
    }

    /// Re-quote an existing order against the *current* catalog price and
    /// persist the new state. `order_date` is preserved.
    #[instrument(skip(self))]
    pub async fn update_order(
        &self,
        id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Order, PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }
        if self.orders.get(id).await?.is_none() {
            return Err(PricingError::OrderNotFound(id));
        }

        let quote = self.quote(product_id, quantity).await?;
        let order = self
            .orders
            .update(
                id,
                OrderChanges {
                    product_id: Some(product_id),
                    quantity,
                    total_price: quote.total_price,
                    order_date: None,
                },
            )
            .await?;
        Ok(order)
    }
}
