//! # In-Memory Store Actor
//!
//! The `StoreActor` is the bundled [`OrderStore`](crate::framework::OrderStore) backend. It
//! owns every order in a `BTreeMap` and processes [`StoreRequest`]s sequentially inside its
//! own Tokio task, so each request (including the conditional `SaveIf`) is atomic without
//! any locking.

use crate::framework::error::FrameworkError;
use crate::framework::client::StoreClient;
use crate::framework::message::StoreRequest;
use crate::model::{Order, OrderId, OrderState};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// ## StoreActor
///
/// The "server" half of the in-memory store.
///
/// * **Ordering** – orders are keyed by id and ids grow monotonically, so iteration order
///   is insertion order. "Earliest placed" is simply the first PLACED entry.
/// * **Id assignment** – an order saved with [`OrderId::UNSAVED`] gets the next id.
/// * **Seeding** – [`StoreActor::seeded`] starts from existing orders, which is how tests
///   model durable state that outlives a restart of the order actor.
///
/// ```rust
/// use order_lifecycle::framework::{OrderStore, StoreActor};
/// use order_lifecycle::model::{Order, UserId};
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, store) = StoreActor::new(10);
///     tokio::spawn(actor.run());
///
///     let saved = store.save(Order::draft(UserId(1), chrono::Utc::now())).await.unwrap();
///     assert!(saved.id.is_saved());
/// }
/// ```
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    orders: BTreeMap<OrderId, Order>,
    /// `None` once every id has been handed out.
    next_id: Option<u32>,
}

impl StoreActor {
    /// Creates an empty store and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        Self::seeded(buffer_size, Vec::new())
    }

    /// Creates a store already holding `orders`. Orders without an id are assigned one.
    pub fn seeded(buffer_size: usize, orders: impl IntoIterator<Item = Order>) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut actor = Self {
            receiver,
            orders: BTreeMap::new(),
            next_id: Some(1),
        };
        for order in orders {
            if let Err(e) = actor.upsert(order) {
                warn!(error = %e, "Seed order dropped");
            }
        }
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(size = self.orders.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::FindDraftsByCustomer {
                    customer,
                    respond_to,
                } => {
                    let drafts: Vec<Order> = self
                        .orders
                        .values()
                        .filter(|o| o.state == OrderState::Draft && o.customer == customer)
                        .cloned()
                        .collect();
                    debug!(%customer, found = drafts.len(), "FindDraftsByCustomer");
                    let _ = respond_to.send(Ok(drafts));
                }
                StoreRequest::FindEarliestPlaced { respond_to } => {
                    let order = self.first_in(OrderState::Placed).cloned();
                    debug!(found = order.is_some(), "FindEarliestPlaced");
                    let _ = respond_to.send(Ok(order));
                }
                StoreRequest::FindOngoing { respond_to } => {
                    let ongoing: Vec<Order> = self
                        .orders
                        .values()
                        .filter(|o| o.state == OrderState::Ongoing)
                        .cloned()
                        .collect();
                    debug!(found = ongoing.len(), "FindOngoing");
                    let _ = respond_to.send(Ok(ongoing));
                }
                StoreRequest::FindById { id, respond_to } => {
                    let order = self.orders.get(&id).cloned();
                    debug!(%id, found = order.is_some(), "FindById");
                    let _ = respond_to.send(Ok(order));
                }
                StoreRequest::Save { order, respond_to } => {
                    let result = self.upsert(order);
                    match &result {
                        Ok(saved) => {
                            info!(order_id = %saved.id, state = %saved.state, size = self.orders.len(), "Saved")
                        }
                        Err(e) => warn!(error = %e, "Save refused"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::SaveIf {
                    order,
                    expected,
                    respond_to,
                } => {
                    let current = self.orders.get(&order.id).map(|o| o.state);
                    if current == Some(expected) {
                        let result = self.upsert(order);
                        if let Ok(saved) = &result {
                            info!(order_id = %saved.id, from = %expected, to = %saved.state, "Saved");
                        }
                        let _ = respond_to.send(result.map(Some));
                    } else {
                        warn!(order_id = %order.id, %expected, ?current, "Conditional save refused");
                        let _ = respond_to.send(Ok(None));
                    }
                }
                StoreRequest::Count { state, respond_to } => {
                    let count = match state {
                        Some(state) => self.orders.values().filter(|o| o.state == state).count(),
                        None => self.orders.len(),
                    };
                    debug!(?state, count, "Count");
                    let _ = respond_to.send(Ok(count as u64));
                }
            }
        }

        info!(size = self.orders.len(), "Store shutdown");
    }

    fn first_in(&self, state: OrderState) -> Option<&Order> {
        self.orders.values().find(|o| o.state == state)
    }

    fn upsert(&mut self, mut order: Order) -> Result<Order, FrameworkError> {
        if !order.id.is_saved() {
            let id = self
                .next_id
                .ok_or_else(|| FrameworkError::Unavailable("order ids exhausted".to_string()))?;
            order.id = OrderId(id);
        }
        if let Some(next) = self.next_id {
            if order.id.0 >= next {
                self.next_id = order.id.0.checked_add(1);
            }
        }
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::OrderStore;
    use crate::model::{Item, ItemId, UserId};
    use chrono::Utc;

    fn placed(customer: u32) -> Order {
        let mut order = Order::draft(UserId(customer), Utc::now());
        order
            .add_item(Item::new(ItemId(1), 10.0, Vec::<String>::new()), Utc::now())
            .unwrap();
        order.confirm().unwrap();
        order
    }

    #[tokio::test]
    async fn test_ids_follow_insertion_order() {
        let (actor, store) = StoreActor::new(10);
        tokio::spawn(actor.run());

        let first = store.save(placed(1)).await.unwrap();
        let second = store.save(placed(2)).await.unwrap();
        assert_eq!(first.id, OrderId(1));
        assert_eq!(second.id, OrderId(2));

        let earliest = store.find_earliest_placed().await.unwrap().unwrap();
        assert_eq!(earliest.id, first.id);
        assert_eq!(store.count(Some(OrderState::Placed)).await.unwrap(), 2);
        assert_eq!(store.count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_if_refuses_stale_state() {
        let (actor, store) = StoreActor::new(10);
        tokio::spawn(actor.run());

        let saved = store.save(placed(1)).await.unwrap();

        let mut first_claim = saved.clone();
        first_claim.claim(UserId(10)).unwrap();
        let mut second_claim = saved.clone();
        second_claim.claim(UserId(11)).unwrap();

        let won = store.save_if(first_claim, OrderState::Placed).await.unwrap();
        let lost = store.save_if(second_claim, OrderState::Placed).await.unwrap();
        assert!(won.is_some());
        assert!(lost.is_none());

        let stored = store.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.worker, Some(UserId(10)));
    }

    #[tokio::test]
    async fn test_seeded_store_continues_numbering() {
        let mut existing = placed(1);
        existing.id = OrderId(7);
        let (actor, store) = StoreActor::seeded(10, vec![existing]);
        tokio::spawn(actor.run());

        let next = store.save(placed(2)).await.unwrap();
        assert_eq!(next.id, OrderId(8));
    }

    #[tokio::test]
    async fn test_exhausted_ids_are_reported() {
        let mut last = placed(1);
        last.id = OrderId(u32::MAX);
        let (actor, store) = StoreActor::seeded(10, vec![last]);
        tokio::spawn(actor.run());

        let result = store.save(placed(2)).await;
        assert!(matches!(result, Err(FrameworkError::Unavailable(_))));

        // Orders that already have an id are still writable.
        let mut existing = store.find_by_id(OrderId(u32::MAX)).await.unwrap().unwrap();
        existing.claim(UserId(3)).unwrap();
        let claimed = store.save_if(existing, OrderState::Placed).await.unwrap();
        assert_eq!(claimed.map(|o| o.worker), Some(Some(UserId(3))));
        assert_eq!(store.count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_client_reports_closed_actor() {
        let (actor, store) = StoreActor::new(10);
        drop(actor);
        let result = store.find_ongoing().await;
        assert!(matches!(result, Err(crate::framework::FrameworkError::ActorClosed)));
    }
}
