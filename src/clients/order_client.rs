//! # Order Client
//!
//! Provides a high-level API for interacting with the `Order` actor.
//! Each method packages one lifecycle operation as an [`OrderRequest`] and waits for the reply.
use crate::model::{Item, Order, OrderId, User};
use crate::order_actor::{OrderError, OrderRequest, Reply};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
///
/// Cheap to clone; every clone talks to the same actor. The actor shuts down once the
/// last clone is dropped.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    /// Adds `item` to the caller's draft, starting a new draft if there is none.
    #[instrument(skip(self, user, item), fields(user = %user.id))]
    pub async fn compose_order(&self, user: &User, item: Item) -> Result<Order, OrderError> {
        debug!(?item, "compose_order called");
        let user = user.clone();
        self.send(|respond_to| OrderRequest::Compose {
            user,
            item,
            respond_to,
        })
        .await
    }

    /// Places the caller's only draft.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn confirm_order(&self, user: &User) -> Result<(), OrderError> {
        let user = user.clone();
        self.send(|respond_to| OrderRequest::Confirm { user, respond_to })
            .await
    }

    /// Takes the longest-waiting placed order. `Ok(None)` when nothing is waiting.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn claim_next_order(&self, user: &User) -> Result<Option<Order>, OrderError> {
        let user = user.clone();
        self.send(|respond_to| OrderRequest::ClaimNext { user, respond_to })
            .await
    }

    /// The order the calling worker is fulfilling, answered from memory.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn active_order(&self, user: &User) -> Result<Option<Order>, OrderError> {
        let user = user.clone();
        self.send(|respond_to| OrderRequest::Active { user, respond_to })
            .await
    }

    /// Serves `order_id`, which must be the caller's active order.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn complete_order(&self, user: &User, order_id: OrderId) -> Result<(), OrderError> {
        let user = user.clone();
        self.send(|respond_to| OrderRequest::Complete {
            user,
            order_id,
            respond_to,
        })
        .await
    }

    async fn send<T>(&self, request: impl FnOnce(Reply<T>) -> OrderRequest) -> Result<T, OrderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| OrderError::ActorCommunicationError("order actor closed".to_string()))?;
        response.await.map_err(|_| {
            OrderError::ActorCommunicationError("order actor dropped the request".to_string())
        })?
    }
}
