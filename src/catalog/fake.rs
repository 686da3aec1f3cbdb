//! In-memory catalog doubles for testing without a network stack.
//!
//! [`FakeCatalogClient`] behaves like a scriptable upstream: seed it with
//! records, change prices between calls, or flip it unavailable to simulate
//! an outage. [`FailingCatalogClient`] panics on any fetch — use it to prove
//! a code path never touches the network.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{CatalogError, ProductCatalogClient};
use crate::model::{ProductId, ProductRecord};

/// Scriptable in-memory upstream catalog.
#[derive(Default)]
pub struct FakeCatalogClient {
    records: Mutex<BTreeMap<ProductId, ProductRecord>>,
    unavailable: AtomicBool,
}

impl FakeCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an upstream product.
    pub fn put(&self, id: ProductId, name: &str, price: Decimal) {
        self.records
            .lock()
            .unwrap()
            .insert(id, ProductRecord::new(id, name, price));
    }

    /// Change the price of an already-seeded product.
    pub fn set_price(&self, id: ProductId, price: Decimal) {
        if let Some(record) = self.records.lock().unwrap().get_mut(&id) {
            record.price = price;
        }
    }

    /// Remove a product from the upstream set, as if it were deleted there.
    pub fn remove(&self, id: ProductId) {
        self.records.lock().unwrap().remove(&id);
    }

    /// Simulate a transport outage: every subsequent call fails with
    /// [`CatalogError::Unavailable`] until flipped back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CatalogError::Unavailable("simulated outage".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductCatalogClient for FakeCatalogClient {
    async fn fetch_by_id(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError> {
        self.check_available()?;
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        self.check_available()?;
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn probe(&self) -> bool {
        self.check_available().is_ok()
    }
}

/// A catalog client that must never be called. Any fetch panics, which makes
/// it a proof that the path under test was served entirely from the replica.
pub struct FailingCatalogClient;

#[async_trait]
impl ProductCatalogClient for FailingCatalogClient {
    async fn fetch_by_id(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError> {
        panic!("unexpected catalog call: fetch_by_id({id})");
    }

    async fn fetch_all(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        panic!("unexpected catalog call: fetch_all");
    }

    async fn probe(&self) -> bool {
        panic!("unexpected catalog call: probe");
    }
}
