//! Pure data structures shared across the engine: replica records, orders,
//! price quotes, and synchronization reports.

pub mod order;
pub mod product;
pub mod report;

pub use order::*;
pub use product::*;
pub use report::*;

/// Identifier assigned by the upstream catalog service. Trusted as-is;
/// not globally unique across services.
pub type ProductId = i64;

/// Identifier assigned locally by the order store, monotonically increasing.
pub type OrderId = u64;
