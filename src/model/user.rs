use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u32);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// A named permission required to invoke an order operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Add items to the caller's draft order.
    ComposeOrder,
    /// Turn the caller's draft into a placed order.
    ConfirmOrder,
    /// Take the next placed order off the queue.
    ClaimOrder,
    /// Held by workers: inspect and complete the order they are fulfilling.
    CompleteOrder,
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Capability::ComposeOrder => "compose-order",
            Capability::ConfirmOrder => "confirm-order",
            Capability::ClaimOrder => "claim-order",
            Capability::CompleteOrder => "complete-order",
        };
        f.write_str(label)
    }
}

/// An authenticated caller, already resolved by the identity provider.
///
/// Customers and workers are both users; what they may do is decided solely by
/// the capabilities they hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub capabilities: BTreeSet<Capability>,
}

impl User {
    /// Creates a user holding exactly the given capabilities.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// A customer may compose and confirm orders.
    pub fn customer(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            email,
            [Capability::ComposeOrder, Capability::ConfirmOrder],
        )
    }

    /// A worker may claim, inspect and complete orders.
    pub fn worker(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            email,
            [Capability::ClaimOrder, Capability::CompleteOrder],
        )
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
