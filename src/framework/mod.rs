//! Persistence plumbing for orders.
//!
//! # Main Components
//!
//! - [`OrderStore`] - The gateway contract the order lifecycle is written against
//! - [`StoreActor`] - In-memory store running as its own actor
//! - [`StoreClient`] - Cloneable handle implementing [`OrderStore`] over the actor's channel
//! - [`FrameworkError`] - Transport and storage failures
//!
//! # Testing
//!
//! See [`mock`] for a scripted store used to exercise failure paths.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::FrameworkError;
pub use message::{Response, StoreRequest};
pub use store::OrderStore;
