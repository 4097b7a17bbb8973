//! Error types for the Order actor.

use crate::framework::FrameworkError;
use crate::model::{Capability, InvalidTransition, OrderId, UserId};
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Callers branch on the variant: only [`OrderError::PersistenceError`] and
/// [`OrderError::ActorCommunicationError`] describe infrastructure trouble, the others are
/// outright rejections of the request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The caller lacks the capability the operation requires.
    #[error("{user} lacks capability {capability}")]
    AuthorizationError { user: UserId, capability: Capability },

    /// A precondition the lifecycle guarantees was found false.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order store failed.
    #[error("Order store error: {0}")]
    PersistenceError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        OrderError::PersistenceError(e.to_string())
    }
}

impl From<InvalidTransition> for OrderError {
    fn from(e: InvalidTransition) -> Self {
        OrderError::InvariantViolation(e.to_string())
    }
}
