//! Local durable cache of upstream catalog records.
//!
//! The store is a Tokio task owning its state ([`ReplicaStoreActor`]); all
//! access goes through the cloneable [`ReplicaStoreClient`]. The message
//! loop is the only writer, so readers never observe a torn batch and no
//! locks guard the record map. [`ReplicaSynchronizer`] is the only component
//! that writes the replica.

pub mod store;
pub mod sync;

pub use store::{ReplicaStoreActor, ReplicaStoreClient, ReplicaStoreError};
pub use sync::{ReplicaSynchronizer, SyncError};
