//! Requests accepted by the [`OrderActor`](crate::order_actor::OrderActor).

use crate::model::{Item, Order, OrderId, User};
use crate::order_actor::OrderError;
use tokio::sync::oneshot;

/// One-shot reply channel for order operations.
pub type Reply<T> = oneshot::Sender<Result<T, OrderError>>;

/// Every variant carries the caller, already resolved by the identity provider.
#[derive(Debug)]
pub enum OrderRequest {
    Compose {
        user: User,
        item: Item,
        respond_to: Reply<Order>,
    },
    Confirm {
        user: User,
        respond_to: Reply<()>,
    },
    ClaimNext {
        user: User,
        respond_to: Reply<Option<Order>>,
    },
    Active {
        user: User,
        respond_to: Reply<Option<Order>>,
    },
    Complete {
        user: User,
        order_id: OrderId,
        respond_to: Reply<()>,
    },
}
