use std::sync::Arc;

use rust_decimal::Decimal;

use order_engine::catalog::FakeCatalogClient;
use order_engine::replica::{ReplicaStoreActor, ReplicaSynchronizer};

fn spawn_synchronizer(
    catalog: Arc<FakeCatalogClient>,
) -> (ReplicaSynchronizer, order_engine::replica::ReplicaStoreClient) {
    let (actor, replica) = ReplicaStoreActor::new(8);
    tokio::spawn(actor.run());
    let synchronizer = ReplicaSynchronizer::new(catalog, replica.clone());
    (synchronizer, replica)
}

#[tokio::test]
async fn first_sync_inserts_full_upstream_set() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    catalog.put(2, "Smartphone", Decimal::from(25000));
    catalog.put(3, "Tablet", Decimal::from(18000));
    let (synchronizer, replica) = spawn_synchronizer(catalog);

    let report = synchronizer.sync().await.unwrap();
    assert_eq!(report.new_count, 3);
    assert_eq!(report.updated_count, 0);
    assert_eq!(report.replica_size, 3);

    let laptop = replica.get(1).await.unwrap().unwrap();
    assert_eq!(laptop.name, "Laptop");
    assert_eq!(laptop.price, Decimal::from(55000));

    let all = replica.get_all().await.unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

/// Two runs with no upstream change in between: the second reports zero.
#[tokio::test]
async fn sync_is_idempotent() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    catalog.put(2, "Smartphone", Decimal::from(25000));
    let (synchronizer, _replica) = spawn_synchronizer(catalog);

    synchronizer.sync().await.unwrap();
    let second = synchronizer.sync().await.unwrap();
    assert_eq!(second.new_count, 0);
    assert_eq!(second.updated_count, 0);
    assert_eq!(second.replica_size, 2);
}

#[tokio::test]
async fn price_drift_counts_as_update_not_insert() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    let (synchronizer, replica) = spawn_synchronizer(catalog.clone());

    synchronizer.sync().await.unwrap();
    catalog.set_price(1, Decimal::from(60000));

    let report = synchronizer.sync().await.unwrap();
    assert_eq!(report.new_count, 0);
    assert_eq!(report.updated_count, 1);
    assert_eq!(
        replica.get(1).await.unwrap().unwrap().price,
        Decimal::from(60000)
    );
}

/// An unreachable upstream must leave the replica exactly as it was.
#[tokio::test]
async fn failed_fetch_never_shrinks_the_replica() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    catalog.put(2, "Smartphone", Decimal::from(25000));
    let (synchronizer, replica) = spawn_synchronizer(catalog.clone());

    synchronizer.sync().await.unwrap();
    let before = replica.all_ids().await.unwrap();

    catalog.set_unavailable(true);
    let report = synchronizer.sync().await.unwrap();
    assert_eq!(report.new_count, 0);
    assert_eq!(report.updated_count, 0);
    assert_eq!(report.replica_size, before.len());
    assert_eq!(replica.all_ids().await.unwrap(), before);
}

/// An empty upstream set is treated as missing data, not mass deletion.
#[tokio::test]
async fn empty_fetch_is_a_no_op() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    let (synchronizer, replica) = spawn_synchronizer(catalog.clone());

    synchronizer.sync().await.unwrap();
    catalog.remove(1);

    let report = synchronizer.sync().await.unwrap();
    assert_eq!(report.new_count, 0);
    assert_eq!(report.updated_count, 0);
    assert_eq!(report.replica_size, 1);
    assert!(replica.get(1).await.unwrap().is_some());
}

/// A product removed upstream while others remain stays in the replica:
/// reconciliation is tombstone-free so historical references keep resolving.
#[tokio::test]
async fn upstream_deletion_is_not_propagated() {
    let catalog = Arc::new(FakeCatalogClient::new());
    catalog.put(1, "Laptop", Decimal::from(55000));
    catalog.put(3, "Tablet", Decimal::from(18000));
    let (synchronizer, replica) = spawn_synchronizer(catalog.clone());

    synchronizer.sync().await.unwrap();
    catalog.remove(3);

    let report = synchronizer.sync().await.unwrap();
    assert_eq!(report.replica_size, 2);
    let tablet = replica.get(3).await.unwrap().unwrap();
    assert_eq!(tablet.name, "Tablet");
}
