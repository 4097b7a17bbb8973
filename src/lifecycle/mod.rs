//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the actors that make up the order system.
//!
//! ## Startup Order
//!
//! 1. **Store** - the bundled [`StoreActor`](crate::framework::StoreActor) is spawned first
//!    (skipped when an external [`OrderStore`](crate::framework::OrderStore) is supplied)
//! 2. **Order actor** - spawned with its [`OrderContext`](crate::order_actor::OrderContext);
//!    it rebuilds the worker assignments from the store before serving anything
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the order client** - the order actor's channel closes, it drains and exits,
//!    releasing its store handle and discarding the in-memory assignments
//! 2. **Drop the store client** - the store actor's channel closes and it exits
//! 3. **Await completion** - both tasks are joined; a failed startup is reported here
//!
//! Restarting is the same as starting: a fresh [`OrderSystem`] over the same store ends up
//! with the same assignments, because they are derived from the ONGOING orders.

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use tracing::*;
