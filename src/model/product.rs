use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A locally replicated catalog record.
///
/// The replica is refreshed by the synchronizer and read by the pricing
/// engine; it is a cache of the upstream catalog, never a source of truth.
/// `last_synced_at` records when this copy was taken from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub last_synced_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            last_synced_at: Utc::now(),
        }
    }

    /// True when `other` carries different catalog content for the same id.
    /// Only `name` and `price` participate; `last_synced_at` is replica
    /// bookkeeping, not catalog content.
    pub fn differs_from(&self, other: &ProductRecord) -> bool {
        self.name != other.name || self.price != other.price
    }
}
