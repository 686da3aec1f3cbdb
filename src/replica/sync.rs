//! Reconciliation of the local replica against the upstream catalog.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{ReplicaStoreClient, ReplicaStoreError};
use crate::catalog::ProductCatalogClient;
use crate::model::SyncReport;

/// Errors surfaced by a synchronization run.
///
/// An unreachable upstream is deliberately *not* an error here: sync is
/// expected to tolerate transient upstream absence and reports zero changes
/// instead. Only a local storage fault fails the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("replica storage failure: {0}")]
    Storage(String),
}

impl From<ReplicaStoreError> for SyncError {
    fn from(e: ReplicaStoreError) -> Self {
        SyncError::Storage(e.to_string())
    }
}

/// Brings the replica into agreement with the upstream catalog on demand.
///
/// Runs only when triggered (an operator or API action); never on a timer.
/// Runs are serialized by a run-level mutex so two concurrent triggers
/// cannot interleave their staged batches. The design is tombstone-free: a
/// product absent from the latest upstream fetch stays in the replica, so
/// historical order references remain resolvable.
pub struct ReplicaSynchronizer {
    catalog: Arc<dyn ProductCatalogClient>,
    replica: ReplicaStoreClient,
    run_lock: Mutex<()>,
}

impl ReplicaSynchronizer {
    pub fn new(catalog: Arc<dyn ProductCatalogClient>, replica: ReplicaStoreClient) -> Self {
        Self {
            catalog,
            replica,
            run_lock: Mutex::new(()),
        }
    }

    /// One reconciliation run. Idempotent: with no upstream changes between
    /// runs, the second run reports zero inserts and zero updates.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let _guard = self.run_lock.lock().await;

        let upstream = match self.catalog.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                // Absence of data is not an upstream-declared deletion.
                warn!(error = %e, "Upstream unavailable, sync is a no-op");
                let size = self.replica.all_ids().await?.len();
                return Ok(SyncReport::unchanged(size));
            }
        };

        if upstream.is_empty() {
            info!("Upstream returned no products, sync is a no-op");
            let size = self.replica.all_ids().await?.len();
            return Ok(SyncReport::unchanged(size));
        }

        let local_ids = self.replica.all_ids().await?;

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for record in upstream {
            if !local_ids.contains(&record.id) {
                inserts.push(record);
            } else {
                // Present locally: stage an update only on real drift.
                match self.replica.get(record.id).await? {
                    Some(existing) if existing.differs_from(&record) => updates.push(record),
                    Some(_) => {}
                    None => inserts.push(record),
                }
            }
        }

        let report = SyncReport {
            new_count: inserts.len(),
            updated_count: updates.len(),
            replica_size: self.replica.apply_batch(inserts, updates).await?,
        };
        info!(
            new = report.new_count,
            updated = report.updated_count,
            size = report.replica_size,
            "Sync complete"
        );
        Ok(report)
    }
}
