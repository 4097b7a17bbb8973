//! # Framework Errors
//!
//! Errors raised by the persistence side of the system: the transport between a
//! [`StoreClient`](crate::framework::StoreClient) and its actor, or the backing store itself.

/// Errors that can occur while talking to an order store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
