//! Order store actor and client.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::model::{Order, OrderId, ProductId};

const STORE: &str = "Orders";

/// Errors surfaced by the order store client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderStoreError {
    #[error("order not found: {0}")]
    NotFound(OrderId),
    #[error("count must be positive")]
    InvalidCount,
    #[error("order store unavailable: {0}")]
    Storage(String),
}

/// Everything needed to persist a freshly priced order. The id is assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub total_price: Decimal,
    pub order_date: DateTime<Utc>,
}

/// Replacement state for an existing order. `order_date: None` leaves the
/// original date untouched; the store never rewrites it on its own.
#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub total_price: Decimal,
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum OrderRequest {
    Create {
        draft: OrderDraft,
        respond_to: oneshot::Sender<Order>,
    },
    Get {
        id: OrderId,
        respond_to: oneshot::Sender<Option<Order>>,
    },
    List {
        respond_to: oneshot::Sender<Vec<Order>>,
    },
    Update {
        id: OrderId,
        changes: OrderChanges,
        respond_to: oneshot::Sender<Result<Order, OrderStoreError>>,
    },
    Delete {
        id: OrderId,
        respond_to: oneshot::Sender<Result<(), OrderStoreError>>,
    },
    FindByDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        respond_to: oneshot::Sender<Vec<Order>>,
    },
    FindRecent {
        count: usize,
        respond_to: oneshot::Sender<Vec<Order>>,
    },
    MarkPaid {
        id: OrderId,
        respond_to: oneshot::Sender<Result<Order, OrderStoreError>>,
    },
    DetachProduct {
        product_id: ProductId,
        respond_to: oneshot::Sender<usize>,
    },
}

/// The task that owns the order records and the id counter.
pub struct OrderStoreActor {
    receiver: mpsc::Receiver<OrderRequest>,
    orders: HashMap<OrderId, Order>,
    next_id: OrderId,
}

impl OrderStoreActor {
    pub fn new(buffer_size: usize) -> (Self, OrderStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            orders: HashMap::new(),
            next_id: 1,
        };
        (actor, OrderStoreClient { sender })
    }

    fn sorted_desc(&self) -> Vec<Order> {
        let mut all: Vec<_> = self.orders.values().cloned().collect();
        all.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        all
    }

    /// Runs the store's event loop until every client is dropped.
    pub async fn run(mut self) {
        info!(store = STORE, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::Create { draft, respond_to } => {
                    let id = self.next_id;
                    self.next_id += 1;
                    let order = Order {
                        id,
                        product_id: draft.product_id,
                        quantity: draft.quantity,
                        total_price: draft.total_price,
                        order_date: draft.order_date,
                        paid: false,
                    };
                    self.orders.insert(id, order.clone());
                    info!(store = STORE, %id, size = self.orders.len(), "Created");
                    let _ = respond_to.send(order);
                }
                OrderRequest::Get { id, respond_to } => {
                    let order = self.orders.get(&id).cloned();
                    debug!(store = STORE, %id, found = order.is_some(), "Get");
                    let _ = respond_to.send(order);
                }
                OrderRequest::List { respond_to } => {
                    let _ = respond_to.send(self.sorted_desc());
                }
                OrderRequest::Update {
                    id,
                    changes,
                    respond_to,
                } => {
                    let result = match self.orders.get_mut(&id) {
                        Some(order) => {
                            order.product_id = changes.product_id;
                            order.quantity = changes.quantity;
                            order.total_price = changes.total_price;
                            if let Some(date) = changes.order_date {
                                order.order_date = date;
                            }
                            info!(store = STORE, %id, "Updated");
                            Ok(order.clone())
                        }
                        None => {
                            warn!(store = STORE, %id, "Not found");
                            Err(OrderStoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                OrderRequest::Delete { id, respond_to } => {
                    let result = match self.orders.remove(&id) {
                        Some(_) => {
                            info!(store = STORE, %id, size = self.orders.len(), "Deleted");
                            Ok(())
                        }
                        None => {
                            warn!(store = STORE, %id, "Not found");
                            Err(OrderStoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                OrderRequest::FindByDateRange {
                    start,
                    end,
                    respond_to,
                } => {
                    let mut hits: Vec<_> = self
                        .orders
                        .values()
                        .filter(|o| o.order_date >= start && o.order_date <= end)
                        .cloned()
                        .collect();
                    hits.sort_by(|a, b| a.order_date.cmp(&b.order_date).then(a.id.cmp(&b.id)));
                    let _ = respond_to.send(hits);
                }
                OrderRequest::FindRecent { count, respond_to } => {
                    let mut recent = self.sorted_desc();
                    recent.truncate(count);
                    let _ = respond_to.send(recent);
                }
                OrderRequest::MarkPaid { id, respond_to } => {
                    let result = match self.orders.get_mut(&id) {
                        Some(order) => {
                            order.paid = true;
                            info!(store = STORE, %id, "Marked paid");
                            Ok(order.clone())
                        }
                        None => {
                            warn!(store = STORE, %id, "Not found");
                            Err(OrderStoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                OrderRequest::DetachProduct {
                    product_id,
                    respond_to,
                } => {
                    let mut detached = 0;
                    for order in self.orders.values_mut() {
                        if order.product_id == Some(product_id) {
                            order.product_id = None;
                            detached += 1;
                        }
                    }
                    info!(store = STORE, %product_id, detached, "Detached product");
                    let _ = respond_to.send(detached);
                }
            }
        }

        info!(store = STORE, size = self.orders.len(), "Shutdown");
    }
}

/// Cloneable handle to the order store actor.
#[derive(Clone)]
pub struct OrderStoreClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderStoreClient {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> OrderRequest,
    ) -> Result<T, OrderStoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| OrderStoreError::Storage("store closed".into()))?;
        response
            .await
            .map_err(|_| OrderStoreError::Storage("store dropped response".into()))
    }

    pub async fn create(&self, draft: OrderDraft) -> Result<Order, OrderStoreError> {
        self.request(|respond_to| OrderRequest::Create { draft, respond_to })
            .await
    }

    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderStoreError> {
        self.request(|respond_to| OrderRequest::Get { id, respond_to })
            .await
    }

    /// All orders, most recent first.
    pub async fn list(&self) -> Result<Vec<Order>, OrderStoreError> {
        self.request(|respond_to| OrderRequest::List { respond_to })
            .await
    }

    pub async fn update(
        &self,
        id: OrderId,
        changes: OrderChanges,
    ) -> Result<Order, OrderStoreError> {
        self.request(|respond_to| OrderRequest::Update {
            id,
            changes,
            respond_to,
        })
        .await?
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderStoreError> {
        self.request(|respond_to| OrderRequest::Delete { id, respond_to })
            .await?
    }

    /// Orders with `start <= order_date <= end`, ascending by date.
    pub async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderStoreError> {
        self.request(|respond_to| OrderRequest::FindByDateRange {
            start,
            end,
            respond_to,
        })
        .await
    }

    /// The `count` most recent orders, descending by date. `count` must be
    /// positive; zero is rejected before the store is consulted.
    pub async fn find_recent(&self, count: usize) -> Result<Vec<Order>, OrderStoreError> {
        if count == 0 {
            return Err(OrderStoreError::InvalidCount);
        }
        self.request(|respond_to| OrderRequest::FindRecent { count, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: OrderId) -> Result<Order, OrderStoreError> {
        self.request(|respond_to| OrderRequest::MarkPaid { id, respond_to })
            .await?
    }

    /// Null out `product_id` on every order referencing `product_id`.
    ///
    /// This is the set-null hook for an upstream-declared deletion: order
    /// history survives, only the reference is dropped. The synchronizer
    /// never calls this on its own — its design is tombstone-free.
    pub async fn detach_product(&self, product_id: ProductId) -> Result<usize, OrderStoreError> {
        self.request(|respond_to| OrderRequest::DetachProduct {
            product_id,
            respond_to,
        })
        .await
    }
}
