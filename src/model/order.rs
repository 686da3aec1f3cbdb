use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, ProductId};

/// A placed order with its price frozen at creation time.
///
/// `total_price` is computed once from `quantity * unit price at creation`
/// and is never recomputed when the catalog drifts. Only an explicit update,
/// which re-quotes at the current price, may change it.
///
/// `product_id` is optional: an order outlives the product it references,
/// so a product removed upstream leaves the order intact (detached rather
/// than cascaded away).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub total_price: Decimal,
    pub order_date: DateTime<Utc>,
    pub paid: bool,
}

/// The outcome of pricing a `(product, quantity)` pair against the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
