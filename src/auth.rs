//! Capability checks run before every order operation.

use crate::model::{Capability, User};
use crate::order_actor::OrderError;
use tracing::warn;

/// Decides whether a resolved user may invoke an operation.
///
/// The gate is stateless: a user is allowed exactly when they hold the capability the
/// operation requires. It is called before the order actor reads the cache or the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityGate;

impl CapabilityGate {
    pub fn check(&self, user: &User, capability: Capability) -> Result<(), OrderError> {
        if user.has_capability(capability) {
            return Ok(());
        }
        warn!(user = %user.id, %capability, "Capability missing");
        Err(OrderError::AuthorizationError {
            user: user.id,
            capability,
        })
    }
}
