use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use order_engine::catalog::{FailingCatalogClient, FakeCatalogClient};
use order_engine::model::ProductRecord;
use order_engine::orders::{OrderDraft, OrderPricingEngine, OrderStoreActor, PricingError};
use order_engine::replica::ReplicaStoreActor;

fn spawn_engine(catalog: Arc<dyn order_engine::catalog::ProductCatalogClient>) -> (
    OrderPricingEngine,
    order_engine::replica::ReplicaStoreClient,
    order_engine::orders::OrderStoreClient,
) {
    let (replica_actor, replica) = ReplicaStoreActor::new(8);
    let (order_actor, orders) = OrderStoreActor::new(8);
    tokio::spawn(replica_actor.run());
    tokio::spawn(order_actor.run());
    let engine = OrderPricingEngine::new(replica.clone(), orders.clone(), catalog);
    (engine, replica, orders)
}

/// A replica hit must never touch the network: the catalog client panics on
/// any call, so this test passing is the proof.
#[tokio::test]
async fn replica_hit_performs_no_network_call() {
    let (engine, replica, _orders) = spawn_engine(Arc::new(FailingCatalogClient));

    replica
        .upsert(ProductRecord::new(1, "Laptop", Decimal::from(55000)))
        .await
        .unwrap();

    let order = engine.create_order(1, 2).await.unwrap();
    assert_eq!(order.total_price, Decimal::from(110_000));
    assert_eq!(order.product_id, Some(1));
    assert_eq!(order.quantity, 2);
    assert!(!order.paid);
}

/// Zero quantity is rejected before any storage or network access.
#[tokio::test]
async fn zero_quantity_rejected_before_any_io() {
    let (engine, _replica, _orders) = spawn_engine(Arc::new(FailingCatalogClient));

    let result = engine.create_order(1, 0).await;
    assert_eq!(result.unwrap_err(), PricingError::InvalidQuantity);

    let result = engine.quote(1, 0).await;
    assert_eq!(result.unwrap_err(), PricingError::InvalidQuantity);
}

#[tokio::test]
async fn replica_miss_falls_back_to_upstream() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(7, "Smartwatch", Decimal::from(12000));
    let (engine, _replica, _orders) = spawn_engine(catalog);

    let quote = engine.quote(7, 3).await.unwrap();
    assert_eq!(quote.unit_price, Decimal::from(12000));
    assert_eq!(quote.total_price, Decimal::from(36000));
}

#[tokio::test]
async fn unknown_product_everywhere_is_not_found() {
    let catalog = Arc::new(FakeCatalogClient::new());
    let (engine, _replica, _orders) = spawn_engine(catalog);

    let result = engine.quote(99, 1).await;
    assert_eq!(result.unwrap_err(), PricingError::ProductNotFound(99));
}

#[tokio::test]
async fn upstream_outage_on_fallback_surfaces_as_upstream_error() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.set_unavailable(true);
    let (engine, _replica, _orders) = spawn_engine(catalog);

    let result = engine.quote(1, 1).await;
    assert!(matches!(result, Err(PricingError::Upstream(_))));
}

/// Updating an order re-quotes at the current catalog price and recomputes
/// the total, but leaves the original order date in place.
#[tokio::test]
async fn update_requotes_at_current_price_and_preserves_date() {
    let (engine, replica, orders) = spawn_engine(Arc::new(FailingCatalogClient));

    replica
        .upsert(ProductRecord::new(1, "Laptop", Decimal::from(55000)))
        .await
        .unwrap();

    let placed_at = Utc::now() - Duration::days(3);
    let order = orders
        .create(OrderDraft {
            product_id: Some(1),
            quantity: 2,
            total_price: Decimal::from(110_000),
            order_date: placed_at,
        })
        .await
        .unwrap();

    // Price drifts after placement.
    replica
        .upsert(ProductRecord::new(1, "Laptop", Decimal::from(60000)))
        .await
        .unwrap();

    let updated = engine.update_order(order.id, 1, 1).await.unwrap();
    assert_eq!(updated.total_price, Decimal::from(60000));
    assert_eq!(updated.quantity, 1);
    assert_eq!(updated.order_date, placed_at);
}

#[tokio::test]
async fn update_of_unknown_order_is_order_not_found() {
    let (engine, replica, _orders) = spawn_engine(Arc::new(FailingCatalogClient));
    replica
        .upsert(ProductRecord::new(1, "Laptop", Decimal::from(55000)))
        .await
        .unwrap();

    let result = engine.update_order(42, 1, 1).await;
    assert_eq!(result.unwrap_err(), PricingError::OrderNotFound(42));
}

#[tokio::test]
async fn update_with_zero_quantity_rejected_before_lookup() {
    let (engine, _replica, _orders) = spawn_engine(Arc::new(FailingCatalogClient));
    let result = engine.update_order(1, 1, 0).await;
    assert_eq!(result.unwrap_err(), PricingError::InvalidQuantity);
}
