//! Order persistence, pricing, and read-side aggregation.
//!
//! The order store follows the same actor recipe as the replica store: one
//! task owns the records and assigns monotonic ids, so writes to any single
//! order are serialized by construction (last-writer-wins, no version
//! token). [`OrderPricingEngine`] is the only component that creates or
//! re-prices orders; [`OrderAnalytics`] is strictly read-only.

pub mod analytics;
pub mod pricing;
pub mod store;

pub use analytics::{AnalyticsError, OrderAnalytics, OrderTotals, ProductRollup};
pub use pricing::{OrderPricingEngine, PricingError};
pub use store::{OrderChanges, OrderDraft, OrderStoreActor, OrderStoreClient, OrderStoreError};
