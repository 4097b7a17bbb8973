//! # Store Client
//!
//! The sending half of the in-memory store: forwards each [`OrderStore`] call to the
//! [`StoreActor`](crate::framework::StoreActor) and awaits the reply.

use crate::framework::error::FrameworkError;
use crate::framework::message::{Response, StoreRequest};
use crate::framework::store::OrderStore;
use crate::model::{Order, OrderId, OrderState, UserId};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// A cheap-to-clone handle on a running `StoreActor`. It holds only the channel sender,
/// so any number of tasks can share the same store. Once every clone is dropped the
/// actor's loop ends.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Response<R>) -> StoreRequest + Send,
    ) -> Result<R, FrameworkError>
    where
        R: Send,
    {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

#[async_trait]
impl OrderStore for StoreClient {
    async fn find_drafts_by_customer(&self, customer: UserId) -> Result<Vec<Order>, FrameworkError> {
        self.call(|respond_to| StoreRequest::FindDraftsByCustomer {
            customer,
            respond_to,
        })
        .await
    }

    async fn find_earliest_placed(&self) -> Result<Option<Order>, FrameworkError> {
        self.call(|respond_to| StoreRequest::FindEarliestPlaced { respond_to })
            .await
    }

    async fn find_ongoing(&self) -> Result<Vec<Order>, FrameworkError> {
        self.call(|respond_to| StoreRequest::FindOngoing { respond_to })
            .await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, FrameworkError> {
        self.call(|respond_to| StoreRequest::FindById { id, respond_to })
            .await
    }

    async fn save(&self, order: Order) -> Result<Order, FrameworkError> {
        self.call(|respond_to| StoreRequest::Save { order, respond_to })
            .await
    }

    async fn save_if(
        &self,
        order: Order,
        expected: OrderState,
    ) -> Result<Option<Order>, FrameworkError> {
        self.call(|respond_to| StoreRequest::SaveIf {
            order,
            expected,
            respond_to,
        })
        .await
    }

    async fn count(&self, state: Option<OrderState>) -> Result<u64, FrameworkError> {
        self.call(|respond_to| StoreRequest::Count { state, respond_to })
            .await
    }
}
