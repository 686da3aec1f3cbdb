//! Read-side aggregation over the order store. No mutation capability.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use super::{OrderStoreClient, OrderStoreError};
use crate::model::{Order, ProductId};

/// Errors surfaced by analytics queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("count must be positive")]
    InvalidCount,
    #[error("order store unavailable: {0}")]
    Storage(String),
}

impl From<OrderStoreError> for AnalyticsError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::InvalidCount => AnalyticsError::InvalidCount,
            other => AnalyticsError::Storage(other.to_string()),
        }
    }
}

/// Aggregates over `total_price`. An empty order set is an explicit state:
/// `count == 0`, `sum == 0`, and no average/max/min — never a division fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub count: usize,
    pub sum: Decimal,
    pub average: Option<Decimal>,
    pub max: Option<Decimal>,
    pub min: Option<Decimal>,
}

/// Per-product rollup. `product_id: None` is the bucket for orphaned orders
/// whose product reference was detached; it participates like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRollup {
    pub product_id: Option<ProductId>,
    pub order_count: usize,
    pub total_quantity: u64,
}

/// Read-only aggregation over the order store.
pub struct OrderAnalytics {
    orders: OrderStoreClient,
}

impl OrderAnalytics {
    pub fn new(orders: OrderStoreClient) -> Self {
        Self { orders }
    }

    /// Count/sum/average/max/min over all order totals.
    #[instrument(skip(self))]
    pub async fn totals(&self) -> Result<OrderTotals, AnalyticsError> {
        let orders = self.orders.list().await?;
        if orders.is_empty() {
            return Ok(OrderTotals {
                count: 0,
                sum: Decimal::ZERO,
                average: None,
                max: None,
                min: None,
            });
        }

        let count = orders.len();
        let sum: Decimal = orders.iter().map(|o| o.total_price).sum();
        let max = orders.iter().map(|o| o.total_price).max();
        let min = orders.iter().map(|o| o.total_price).min();
        Ok(OrderTotals {
            count,
            sum,
            average: Some(sum / Decimal::from(count as u64)),
            max,
            min,
        })
    }

    /// Rollups grouped by product, descending by total quantity.
    #[instrument(skip(self))]
    pub async fn by_product(&self) -> Result<Vec<ProductRollup>, AnalyticsError> {
        let orders = self.orders.list().await?;

        let mut groups: HashMap<Option<ProductId>, (usize, u64)> = HashMap::new();
        for order in &orders {
            let entry = groups.entry(order.product_id).or_default();
            entry.0 += 1;
            entry.1 += u64::from(order.quantity);
        }

        let mut rollups: Vec<_> = groups
            .into_iter()
            .map(|(product_id, (order_count, total_quantity))| ProductRollup {
                product_id,
                order_count,
                total_quantity,
            })
            .collect();
        rollups.sort_by(|a, b| {
            b.total_quantity
                .cmp(&a.total_quantity)
                .then(a.product_id.cmp(&b.product_id))
        });
        Ok(rollups)
    }

    /// The single most-ordered product rollup, if any orders exist.
    pub async fn most_ordered(&self) -> Result<Option<ProductRollup>, AnalyticsError> {
        Ok(self.by_product().await?.into_iter().next())
    }

    /// Orders placed between two dates, inclusive on both ends, ascending by
    /// date. The bare end date is extended to end-of-day before querying.
    #[instrument(skip(self))]
    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Order>, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidRange { start, end });
        }

        let start_at = start.and_time(NaiveTime::MIN).and_utc();
        let end_at = match end.succ_opt() {
            Some(next_day) => {
                next_day.and_time(NaiveTime::MIN).and_utc() - chrono::Duration::nanoseconds(1)
            }
            None => DateTime::<Utc>::MAX_UTC,
        };
        Ok(self.orders.find_by_date_range(start_at, end_at).await?)
    }

    /// The latest `count` orders, most recent first.
    pub async fn recent(&self, count: usize) -> Result<Vec<Order>, AnalyticsError> {
        Ok(self.orders.find_recent(count).await?)
    }
}
