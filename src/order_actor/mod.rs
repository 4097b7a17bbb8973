//! # Order Actor
//!
//! The order lifecycle manager. It drives orders through
//! `DRAFT → PLACED → ONGOING → SERVED` on behalf of customers and workers.
//!
//! ## Structure
//!
//! - [`assignments`] - [`WorkerAssignments`], the worker → active order index
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`message`] - [`OrderRequest`], the requests the actor serves
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Concurrency
//!
//! The actor owns the assignment index and handles one request at a time, so two claims
//! by the same worker can never both pass the "no active order" check. Across workers,
//! the PLACED → ONGOING write is a conditional save, so two workers cannot take the same
//! order even when several actors share one store.
//!
//! ## Startup
//!
//! [`OrderActor::run`] rebuilds the index from the store's ONGOING orders before it reads
//! its first request. Requests sent in the meantime wait in the channel.

pub mod assignments;
pub mod error;
pub mod message;

pub use assignments::*;
pub use error::*;
pub use message::*;

use crate::auth::CapabilityGate;
use crate::clients::OrderClient;
use crate::framework::OrderStore;
use crate::model::{Capability, Item, Order, OrderId, OrderState, User};
use crate::notify::{notify_best_effort, Notifier};
use crate::pricing::PricingEngine;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Conditional writes a single claim may lose before it gives up.
pub const MAX_CLAIM_ATTEMPTS: usize = 8;

/// Dependencies injected into [`OrderActor::run`].
#[derive(Clone)]
pub struct OrderContext {
    pub store: Arc<dyn OrderStore>,
    pub notifier: Arc<dyn Notifier>,
    pub pricing: PricingEngine,
    pub gate: CapabilityGate,
    pub notify_timeout: Duration,
}

impl OrderContext {
    pub fn new(store: Arc<dyn OrderStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            pricing: PricingEngine::default(),
            gate: CapabilityGate,
            notify_timeout: Duration::from_secs(2),
        }
    }
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (OrderActor, OrderClient) {
    OrderActor::new(buffer_size)
}

/// The server half of the order lifecycle.
pub struct OrderActor {
    receiver: mpsc::Receiver<OrderRequest>,
    assignments: WorkerAssignments,
}

impl OrderActor {
    pub fn new(buffer_size: usize) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            assignments: WorkerAssignments::new(),
        };
        (actor, OrderClient::new(sender))
    }

    /// Rebuilds the worker assignments, then serves requests until every client is dropped.
    ///
    /// Returns an error, without serving anything, if the rebuild fails.
    pub async fn run(mut self, ctx: OrderContext) -> Result<(), OrderError> {
        self.assignments = WorkerAssignments::rebuild(ctx.store.as_ref()).await?;
        info!(active = self.assignments.len(), "Order actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::Compose {
                    user,
                    item,
                    respond_to,
                } => {
                    let result = self.compose_order(&ctx, &user, item).await;
                    let _ = respond_to.send(log_outcome("compose_order", &user, result));
                }
                OrderRequest::Confirm { user, respond_to } => {
                    let result = self.confirm_order(&ctx, &user).await;
                    let _ = respond_to.send(log_outcome("confirm_order", &user, result));
                }
                OrderRequest::ClaimNext { user, respond_to } => {
                    let result = self.claim_next_order(&ctx, &user).await;
                    let _ = respond_to.send(log_outcome("claim_next_order", &user, result));
                }
                OrderRequest::Active { user, respond_to } => {
                    let result = self.active_order(&ctx, &user);
                    let _ = respond_to.send(log_outcome("active_order", &user, result));
                }
                OrderRequest::Complete {
                    user,
                    order_id,
                    respond_to,
                } => {
                    let result = self.complete_order(&ctx, &user, order_id).await;
                    let _ = respond_to.send(log_outcome("complete_order", &user, result));
                }
            }
        }

        info!(active = self.assignments.len(), "Order actor shutdown");
        Ok(())
    }

    async fn compose_order(
        &mut self,
        ctx: &OrderContext,
        user: &User,
        item: Item,
    ) -> Result<Order, OrderError> {
        ctx.gate.check(user, Capability::ComposeOrder)?;

        let mut drafts = ctx.store.find_drafts_by_customer(user.id).await?;
        if drafts.len() > 1 {
            return Err(OrderError::InvariantViolation(format!(
                "{} has {} draft orders",
                user.id,
                drafts.len()
            )));
        }
        let now = Utc::now();
        let mut order = drafts.pop().unwrap_or_else(|| Order::draft(user.id, now));
        debug!(?item, order_id = %order.id, "Adding item");
        order.add_item(item, now)?;

        let saved = ctx.store.save(order).await?;
        info!(order_id = %saved.id, items = saved.items.len(), "Draft updated");
        Ok(saved)
    }

    async fn confirm_order(&mut self, ctx: &OrderContext, user: &User) -> Result<(), OrderError> {
        ctx.gate.check(user, Capability::ConfirmOrder)?;

        let drafts = ctx.store.find_drafts_by_customer(user.id).await?;
        let mut order = match <[Order; 1]>::try_from(drafts) {
            Ok([order]) => order,
            Err(drafts) => {
                return Err(OrderError::InvariantViolation(format!(
                    "{} has {} draft orders, expected exactly one",
                    user.id,
                    drafts.len()
                )))
            }
        };
        order.confirm()?;

        let saved = ctx.store.save(order).await?;
        info!(order_id = %saved.id, "Order placed");
        Ok(())
    }

    async fn claim_next_order(
        &mut self,
        ctx: &OrderContext,
        user: &User,
    ) -> Result<Option<Order>, OrderError> {
        ctx.gate.check(user, Capability::ClaimOrder)?;

        for attempt in 1..=MAX_CLAIM_ATTEMPTS {
            let Some(candidate) = ctx.store.find_earliest_placed().await? else {
                debug!("No placed orders");
                return Ok(None);
            };
            if let Some(current) = self.assignments.get(&user.id) {
                return Err(OrderError::InvariantViolation(format!(
                    "{} is already working on {}",
                    user.id, current.id
                )));
            }

            let mut claimed = candidate;
            claimed.claim(user.id)?;
            match ctx.store.save_if(claimed, OrderState::Placed).await? {
                Some(saved) => {
                    self.assignments.try_assign(user.id, saved.clone())?;
                    info!(order_id = %saved.id, worker = %user.id, "Order claimed");
                    return Ok(Some(saved));
                }
                // Taken by someone else between the read and the write; try the next one.
                None => debug!(attempt, "Placed order moved on, retrying"),
            }
        }

        Err(OrderError::PersistenceError(format!(
            "store refused {MAX_CLAIM_ATTEMPTS} claims in a row"
        )))
    }

    fn active_order(&self, ctx: &OrderContext, user: &User) -> Result<Option<Order>, OrderError> {
        ctx.gate.check(user, Capability::CompleteOrder)?;
        Ok(self.assignments.get(&user.id).cloned())
    }

    async fn complete_order(
        &mut self,
        ctx: &OrderContext,
        user: &User,
        order_id: OrderId,
    ) -> Result<(), OrderError> {
        ctx.gate.check(user, Capability::CompleteOrder)?;

        let mut order = ctx
            .store
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;
        if order.state != OrderState::Ongoing {
            return Err(OrderError::InvariantViolation(format!(
                "{} is {}, expected ONGOING",
                order.id, order.state
            )));
        }
        match self.assignments.get(&user.id) {
            Some(active) if active.id == order_id => {}
            active => {
                return Err(OrderError::InvariantViolation(format!(
                    "{} is not assigned {} (active: {:?})",
                    user.id,
                    order_id,
                    active.map(|o| o.id)
                )))
            }
        }

        let amount = ctx.pricing.price(&order.items);
        order.serve(amount, Utc::now())?;
        let served = ctx
            .store
            .save_if(order, OrderState::Ongoing)
            .await?
            .ok_or_else(|| {
                OrderError::InvariantViolation(format!("{order_id} is no longer ONGOING"))
            })?;
        self.assignments.release(&user.id, order_id);
        info!(order_id = %served.id, amount, "Order served");

        // Delivered off the actor task; the reply does not wait for it.
        let notifier = Arc::clone(&ctx.notifier);
        let worker = user.clone();
        let timeout = ctx.notify_timeout;
        tokio::spawn(async move {
            notify_best_effort(notifier.as_ref(), &worker, &served, timeout).await;
        });
        Ok(())
    }
}

fn log_outcome<T>(operation: &str, user: &User, result: Result<T, OrderError>) -> Result<T, OrderError> {
    if let Err(e) = &result {
        warn!(operation, user = %user.id, error = %e, "Rejected");
    }
    result
}
