//! # Order Engine
//!
//! > **Cross-service product replication and order-pricing consistency.**
//!
//! This crate is the core of an order-taking service that depends on an
//! independently deployed product-catalog service. It solves three problems
//! that pull against each other:
//!
//! - **Availability**: orders must be created and priced even when the
//!   upstream catalog is slow or unreachable, so pricing reads a local
//!   replica on the hot path.
//! - **Consistency of history**: an already-placed order's total must never
//!   change because the upstream price changed later. Totals are *frozen* at
//!   creation and only an explicit update re-quotes.
//! - **Convergence**: the replica must be reconcilable with the source of
//!   truth on demand, without losing or duplicating records. Reconciliation
//!   is tombstone-free — upstream deletions are never propagated, so order
//!   history stays resolvable.
//!
//! ## Architecture
//!
//! Each store is an actor: a Tokio task that owns its state and processes
//! typed request messages sequentially from an `mpsc` channel, answering on
//! `oneshot` channels. Because a single task owns each store, writes are
//! serialized without locks, and the replica's sync batch is applied
//! atomically with respect to readers. Cloneable clients wrap the channel
//! senders and are the only way in.
//!
//! ## Module tour
//!
//! - [`model`] — plain data types: [`ProductRecord`](model::ProductRecord),
//!   [`Order`](model::Order), [`SyncReport`](model::SyncReport).
//! - [`catalog`] — the upstream boundary. The
//!   [`ProductCatalogClient`](catalog::ProductCatalogClient) trait keeps the
//!   transport out of the core; [`HttpCatalogClient`](catalog::HttpCatalogClient)
//!   is the production implementation, and [`catalog::fake`] has in-memory
//!   doubles for tests.
//! - [`replica`] — the replica store actor and the
//!   [`ReplicaSynchronizer`](replica::ReplicaSynchronizer).
//! - [`orders`] — the order store actor, the
//!   [`OrderPricingEngine`](orders::OrderPricingEngine), and read-only
//!   [`OrderAnalytics`](orders::OrderAnalytics).
//! - [`runtime`] — [`OrderEngine`](runtime::OrderEngine), which spawns and
//!   wires everything, plus tracing setup.
//!
//! ## Error handling
//!
//! Every component has its own `thiserror` enum and classifies faults at its
//! boundary: invalid input is rejected before any I/O, absence is a typed
//! outcome rather than an exception, transport failures collapse into a
//! single unavailable variant, and storage faults are surfaced, never
//! swallowed. Nothing in the core retries; retry policy belongs to callers.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use order_engine::catalog::{CatalogConfig, HttpCatalogClient};
//! use order_engine::runtime::{setup_tracing, OrderEngine};
//!
//! setup_tracing();
//! let catalog = HttpCatalogClient::new(CatalogConfig::new("http://catalog:8080/api"))?;
//! let engine = OrderEngine::new(Arc::new(catalog));
//!
//! engine.sync_replica().await?;
//! let order = engine.create_order(1, 2).await?;
//! engine.shutdown().await?;
//! ```

pub mod catalog;
pub mod model;
pub mod orders;
pub mod replica;
pub mod runtime;
