use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use order_engine::orders::{
    AnalyticsError, OrderAnalytics, OrderDraft, OrderStoreActor, OrderStoreClient,
};

fn spawn_analytics() -> (OrderAnalytics, OrderStoreClient) {
    let (actor, store) = OrderStoreActor::new(8);
    tokio::spawn(actor.run());
    (OrderAnalytics::new(store.clone()), store)
}

async fn seed(store: &OrderStoreClient, product_id: Option<i64>, quantity: u32, total: i64) {
    store
        .create(OrderDraft {
            product_id,
            quantity,
            total_price: Decimal::from(total),
            order_date: Utc::now(),
        })
        .await
        .unwrap();
}

/// Empty store: explicit zero state, no division fault.
#[tokio::test]
async fn totals_on_empty_store_is_explicit_zero_state() {
    let (analytics, _store) = spawn_analytics();

    let totals = analytics.totals().await.unwrap();
    assert_eq!(totals.count, 0);
    assert_eq!(totals.sum, Decimal::ZERO);
    assert_eq!(totals.average, None);
    assert_eq!(totals.max, None);
    assert_eq!(totals.min, None);
}

#[tokio::test]
async fn totals_aggregates_over_all_orders() {
    let (analytics, store) = spawn_analytics();
    seed(&store, Some(1), 1, 100).await;
    seed(&store, Some(1), 1, 300).await;
    seed(&store, Some(2), 1, 200).await;

    let totals = analytics.totals().await.unwrap();
    assert_eq!(totals.count, 3);
    assert_eq!(totals.sum, Decimal::from(600));
    assert_eq!(totals.average, Some(Decimal::from(200)));
    assert_eq!(totals.max, Some(Decimal::from(300)));
    assert_eq!(totals.min, Some(Decimal::from(100)));
}

/// Orphaned orders form their own bucket; ordering is by total quantity.
#[tokio::test]
async fn by_product_groups_and_sorts_including_orphans() {
    let (analytics, store) = spawn_analytics();
    seed(&store, Some(1), 2, 100).await;
    seed(&store, Some(1), 3, 150).await;
    seed(&store, Some(2), 1, 50).await;
    seed(&store, None, 4, 80).await;

    let rollups = analytics.by_product().await.unwrap();
    assert_eq!(rollups.len(), 3);

    assert_eq!(rollups[0].product_id, Some(1));
    assert_eq!(rollups[0].order_count, 2);
    assert_eq!(rollups[0].total_quantity, 5);

    assert_eq!(rollups[1].product_id, None);
    assert_eq!(rollups[1].total_quantity, 4);

    assert_eq!(rollups[2].product_id, Some(2));
    assert_eq!(rollups[2].total_quantity, 1);

    let top = analytics.most_ordered().await.unwrap().unwrap();
    assert_eq!(top.product_id, Some(1));
}

#[tokio::test]
async fn most_ordered_on_empty_store_is_none() {
    let (analytics, _store) = spawn_analytics();
    assert_eq!(analytics.most_ordered().await.unwrap(), None);
}

#[tokio::test]
async fn date_range_rejects_start_after_end() {
    let (analytics, _store) = spawn_analytics();
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let result = analytics.by_date_range(start, end).await;
    assert_eq!(
        result.unwrap_err(),
        AnalyticsError::InvalidRange { start, end }
    );
}

/// A bare end date covers the whole day, and results come back ascending.
#[tokio::test]
async fn date_range_extends_end_to_end_of_day() {
    let (analytics, store) = spawn_analytics();

    let in_range_late = store
        .create(OrderDraft {
            product_id: Some(1),
            quantity: 1,
            total_price: Decimal::from(10),
            order_date: Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap(),
        })
        .await
        .unwrap();
    let in_range_early = store
        .create(OrderDraft {
            product_id: Some(1),
            quantity: 1,
            total_price: Decimal::from(20),
            order_date: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        })
        .await
        .unwrap();
    store
        .create(OrderDraft {
            product_id: Some(1),
            quantity: 1,
            total_price: Decimal::from(30),
            order_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    let hits = analytics
        .by_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        hits.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![in_range_early.id, in_range_late.id]
    );
}

#[tokio::test]
async fn recent_rejects_zero_count() {
    let (analytics, _store) = spawn_analytics();
    assert_eq!(
        analytics.recent(0).await.unwrap_err(),
        AnalyticsError::InvalidCount
    );
}
