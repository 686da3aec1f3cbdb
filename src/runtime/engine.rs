//! The engine orchestrator.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use crate::catalog::ProductCatalogClient;
use crate::model::{Order, OrderId, ProductId, SyncReport};
use crate::orders::{
    AnalyticsError, OrderAnalytics, OrderPricingEngine, OrderStoreActor, OrderStoreClient,
    OrderStoreError, OrderTotals, PricingError, ProductRollup,
};
use crate::replica::{ReplicaStoreActor, ReplicaStoreClient, ReplicaSynchronizer, SyncError};

const CHANNEL_BUFFER: usize = 32;

/// Wires the replica store, order store, synchronizer, pricing engine, and
/// analytics into one running system.
///
/// The catalog client is the only external dependency; pass an
/// [`HttpCatalogClient`](crate::catalog::HttpCatalogClient) in production or
/// a fake from [`catalog::fake`](crate::catalog::fake) in tests. Both store
/// actors run in their own Tokio tasks; [`shutdown`](Self::shutdown) drops
/// the clients, which closes the channels and lets the actors drain and
/// exit.
pub struct OrderEngine {
    /// Pricing operations: quote, create, re-price.
    pub pricing: OrderPricingEngine,
    /// Read-only aggregation queries.
    pub analytics: OrderAnalytics,
    /// Direct handle to the order store.
    pub orders: OrderStoreClient,
    /// Direct handle to the replica store.
    pub replica: ReplicaStoreClient,
    synchronizer: ReplicaSynchronizer,
    catalog: Arc<dyn ProductCatalogClient>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderEngine {
    pub fn new(catalog: Arc<dyn ProductCatalogClient>) -> Self {
        let (replica_actor, replica) = ReplicaStoreActor::new(CHANNEL_BUFFER);
        let (order_actor, orders) = OrderStoreActor::new(CHANNEL_BUFFER);

        let replica_handle = tokio::spawn(replica_actor.run());
        let order_handle = tokio::spawn(order_actor.run());

        let pricing = OrderPricingEngine::new(replica.clone(), orders.clone(), catalog.clone());
        let analytics = OrderAnalytics::new(orders.clone());
        let synchronizer = ReplicaSynchronizer::new(catalog.clone(), replica.clone());

        Self {
            pricing,
            analytics,
            orders,
            replica,
            synchronizer,
            catalog,
            handles: vec![replica_handle, order_handle],
        }
    }

    // --- Order operations ---

    pub async fn create_order(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Order, PricingError> {
        self.pricing.create_order(product_id, quantity).await
    }

    pub async fn update_order(
        &self,
        id: OrderId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Order, PricingError> {
        self.pricing.update_order(id, product_id, quantity).await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        self.orders.get(id).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderStoreError> {
        self.orders.list().await
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<(), OrderStoreError> {
        self.orders.delete(id).await
    }

    pub async fn mark_paid(&self, id: OrderId) -> Result<Order, OrderStoreError> {
        self.orders.mark_paid(id).await
    }

    // --- Analytics ---

    pub async fn stats(&self) -> Result<OrderTotals, AnalyticsError> {
        self.analytics.totals().await
    }

    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Order>, AnalyticsError> {
        self.analytics.by_date_range(start, end).await
    }

    pub async fn recent_orders(&self, count: usize) -> Result<Vec<Order>, AnalyticsError> {
        self.analytics.recent(count).await
    }

    pub async fn product_rollups(&self) -> Result<Vec<ProductRollup>, AnalyticsError> {
        self.analytics.by_product().await
    }

    // --- Replica operations ---

    /// Trigger one reconciliation run. Idempotent; safe to invoke
    /// repeatedly.
    pub async fn sync_replica(&self) -> Result<SyncReport, SyncError> {
        self.synchronizer.sync().await
    }

    /// Probe the upstream catalog.
    pub async fn catalog_healthy(&self) -> bool {
        self.catalog.probe().await
    }

    /// Gracefully stop both store actors.
    ///
    /// Dropping the clients closes their channels; each actor drains its
    /// queue and exits its loop. Returns an error if an actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down engine");

        let Self {
            pricing,
            analytics,
            orders,
            replica,
            synchronizer,
            handles,
            ..
        } = self;
        drop(pricing);
        drop(analytics);
        drop(synchronizer);
        drop(orders);
        drop(replica);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Store task failed");
                return Err(format!("store task failed: {e:?}"));
            }
        }

        info!("Engine shutdown complete");
        Ok(())
    }
}
