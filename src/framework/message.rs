//! # Store Messages
//!
//! The request type sent from a [`StoreClient`](crate::framework::StoreClient) to the
//! [`StoreActor`](crate::framework::StoreActor). One variant per gateway operation; each
//! carries a oneshot sender the actor answers on.

use crate::framework::error::FrameworkError;
use crate::model::{Order, OrderId, OrderState, UserId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum StoreRequest {
    FindDraftsByCustomer {
        customer: UserId,
        respond_to: Response<Vec<Order>>,
    },
    FindEarliestPlaced {
        respond_to: Response<Option<Order>>,
    },
    FindOngoing {
        respond_to: Response<Vec<Order>>,
    },
    FindById {
        id: OrderId,
        respond_to: Response<Option<Order>>,
    },
    Save {
        order: Order,
        respond_to: Response<Order>,
    },
    /// Persist only if the stored copy is still in `expected`.
    SaveIf {
        order: Order,
        expected: OrderState,
        respond_to: Response<Option<Order>>,
    },
    Count {
        state: Option<OrderState>,
        respond_to: Response<u64>,
    },
}
