//! # OrderStore Trait
//!
//! The persistence contract the order lifecycle depends on. The lifecycle never
//! touches storage any other way, so any backend (the bundled [`StoreActor`], a
//! database adapter, a test mock) can sit behind it.
//!
//! [`StoreActor`]: crate::framework::StoreActor

use crate::framework::FrameworkError;
use crate::model::{Order, OrderId, OrderState, UserId};
use async_trait::async_trait;

/// Durable storage of orders.
///
/// Implementations must give read-your-writes consistency for a single caller and
/// make each single-record read or write atomic.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders of `customer` currently in DRAFT.
    async fn find_drafts_by_customer(&self, customer: UserId) -> Result<Vec<Order>, FrameworkError>;

    /// The PLACED order that has waited longest, if any.
    async fn find_earliest_placed(&self) -> Result<Option<Order>, FrameworkError>;

    /// Every order currently in ONGOING.
    async fn find_ongoing(&self) -> Result<Vec<Order>, FrameworkError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, FrameworkError>;

    /// Inserts or replaces `order`. An [`OrderId::UNSAVED`] order receives a fresh id,
    /// returned in the saved copy.
    async fn save(&self, order: Order) -> Result<Order, FrameworkError>;

    /// Replaces the stored copy of `order` only if that copy is still in `expected`.
    ///
    /// Returns `None` without writing when the order is missing or has moved on.
    async fn save_if(
        &self,
        order: Order,
        expected: OrderState,
    ) -> Result<Option<Order>, FrameworkError>;

    /// Number of orders, optionally restricted to one state.
    async fn count(&self, state: Option<OrderState>) -> Result<u64, FrameworkError>;
}
