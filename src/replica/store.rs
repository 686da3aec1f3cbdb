//! Replica store actor and client.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

use crate::model::{ProductId, ProductRecord};

const STORE: &str = "ProductReplica";

/// Errors surfaced by the replica store client.
///
/// The store itself is in-memory and infallible; the only failure mode is
/// the actor being gone, which the caller sees as a storage failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplicaStoreError {
    #[error("replica store unavailable: {0}")]
    Storage(String),
}

/// Requests handled by the replica store actor. `ApplyBatch` carries a full
/// sync run's staged writes in one message, so concurrent readers see either
/// the pre-batch or the post-batch replica, never something in between.
#[derive(Debug)]
enum ReplicaRequest {
    Get {
        id: ProductId,
        respond_to: oneshot::Sender<Option<ProductRecord>>,
    },
    GetAll {
        respond_to: oneshot::Sender<Vec<ProductRecord>>,
    },
    AllIds {
        respond_to: oneshot::Sender<HashSet<ProductId>>,
    },
    Upsert {
        record: ProductRecord,
        respond_to: oneshot::Sender<usize>,
    },
    ApplyBatch {
        inserts: Vec<ProductRecord>,
        updates: Vec<ProductRecord>,
        respond_to: oneshot::Sender<usize>,
    },
}

/// The task that owns the replicated records.
pub struct ReplicaStoreActor {
    receiver: mpsc::Receiver<ReplicaRequest>,
    records: HashMap<ProductId, ProductRecord>,
}

impl ReplicaStoreActor {
    pub fn new(buffer_size: usize) -> (Self, ReplicaStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
        };
        (actor, ReplicaStoreClient { sender })
    }

    /// Runs the store's event loop until every client is dropped.
    pub async fn run(mut self) {
        info!(store = STORE, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ReplicaRequest::Get { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(store = STORE, %id, found = record.is_some(), "Get");
                    let _ = respond_to.send(record);
                }
                ReplicaRequest::GetAll { respond_to } => {
                    let mut all: Vec<_> = self.records.values().cloned().collect();
                    all.sort_by_key(|r| r.id);
                    let _ = respond_to.send(all);
                }
                ReplicaRequest::AllIds { respond_to } => {
                    let _ = respond_to.send(self.records.keys().copied().collect());
                }
                ReplicaRequest::Upsert { record, respond_to } => {
                    debug!(store = STORE, id = %record.id, "Upsert");
                    self.records.insert(record.id, record);
                    let _ = respond_to.send(self.records.len());
                }
                ReplicaRequest::ApplyBatch {
                    inserts,
                    updates,
                    respond_to,
                } => {
                    let (new, changed) = (inserts.len(), updates.len());
                    for record in inserts.into_iter().chain(updates) {
                        self.records.insert(record.id, record);
                    }
                    info!(
                        store = STORE,
                        new,
                        changed,
                        size = self.records.len(),
                        "Applied sync batch"
                    );
                    let _ = respond_to.send(self.records.len());
                }
            }
        }

        info!(store = STORE, size = self.records.len(), "Shutdown");
    }
}

/// Cloneable handle to the replica store actor.
#[derive(Clone)]
pub struct ReplicaStoreClient {
    sender: mpsc::Sender<ReplicaRequest>,
}

impl ReplicaStoreClient {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ReplicaRequest,
    ) -> Result<T, ReplicaStoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ReplicaStoreError::Storage("store closed".into()))?;
        response
            .await
            .map_err(|_| ReplicaStoreError::Storage("store dropped response".into()))
    }

    /// Local lookup, no network.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, ReplicaStoreError> {
        self.request(|respond_to| ReplicaRequest::Get { id, respond_to })
            .await
    }

    pub async fn get_all(&self) -> Result<Vec<ProductRecord>, ReplicaStoreError> {
        self.request(|respond_to| ReplicaRequest::GetAll { respond_to })
            .await
    }

    pub async fn all_ids(&self) -> Result<HashSet<ProductId>, ReplicaStoreError> {
        self.request(|respond_to| ReplicaRequest::AllIds { respond_to })
            .await
    }

    /// Insert or replace a single record. Returns the replica size.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn upsert(&self, record: ProductRecord) -> Result<usize, ReplicaStoreError> {
        self.request(|respond_to| ReplicaRequest::Upsert { record, respond_to })
            .await
    }

    /// Apply a sync run's staged inserts and updates as one logical batch.
    /// Returns the replica size after the batch.
    pub async fn apply_batch(
        &self,
        inserts: Vec<ProductRecord>,
        updates: Vec<ProductRecord>,
    ) -> Result<usize, ReplicaStoreError> {
        self.request(|respond_to| ReplicaRequest::ApplyBatch {
            inserts,
            updates,
            respond_to,
        })
        .await
    }
}
