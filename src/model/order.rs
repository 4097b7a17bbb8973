//! Orders, their items and the linear lifecycle they move through.
//!
//! Every state change goes through a method on [`Order`] so that the
//! `DRAFT → PLACED → ONGOING → SERVED` sequence cannot be skipped or reversed.

use crate::model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl OrderId {
    /// Carried by an order the store has not assigned an id to yet.
    pub const UNSAVED: OrderId = OrderId(0);

    pub fn is_saved(&self) -> bool {
        *self != Self::UNSAVED
    }
}

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Type-safe identifier for Items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// A single item of an order, typically a pizza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub price: f64,
    pub toppings: BTreeSet<String>,
}

impl Item {
    /// Creates a new Item.
    ///
    /// # Arguments
    /// * `id` - Item identifier
    /// * `price` - Unit price, expected to be non-negative
    /// * `toppings` - Topping labels, order is irrelevant
    pub fn new<S: Into<String>>(
        id: ItemId,
        price: f64,
        toppings: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            price,
            toppings: toppings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_topping(&self, label: &str) -> bool {
        self.toppings.contains(label)
    }
}

/// Lifecycle state of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    Draft,
    Placed,
    Ongoing,
    Served,
}

impl OrderState {
    /// The single state this one may move to, `None` once served.
    pub fn next(self) -> Option<OrderState> {
        match self {
            OrderState::Draft => Some(OrderState::Placed),
            OrderState::Placed => Some(OrderState::Ongoing),
            OrderState::Ongoing => Some(OrderState::Served),
            OrderState::Served => None,
        }
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderState::Draft => "DRAFT",
            OrderState::Placed => "PLACED",
            OrderState::Ongoing => "ONGOING",
            OrderState::Served => "SERVED",
        };
        f.write_str(label)
    }
}

/// A state change the order refused to make.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTransition {
    #[error("{id} cannot move from {from} to {to}")]
    State {
        id: OrderId,
        from: OrderState,
        to: OrderState,
    },

    #[error("{id} is {state}; items can only be added to a draft")]
    NotDraft { id: OrderId, state: OrderState },

    #[error("{0} already has an amount")]
    AmountAlreadySet(OrderId),
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: UserId,
    pub worker: Option<UserId>,
    pub state: OrderState,
    /// Insertion order matters for pricing tie-breaks.
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
}

impl Order {
    /// Creates an empty, unsaved draft owned by `customer`.
    pub fn draft(customer: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::UNSAVED,
            customer,
            worker: None,
            state: OrderState::Draft,
            items: Vec::new(),
            created_at,
            completed_at: None,
            amount: None,
        }
    }

    /// Appends an item and refreshes the creation timestamp.
    pub fn add_item(&mut self, item: Item, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        if self.state != OrderState::Draft {
            return Err(InvalidTransition::NotDraft {
                id: self.id,
                state: self.state,
            });
        }
        self.items.push(item);
        self.created_at = now;
        Ok(())
    }

    /// `DRAFT → PLACED`.
    pub fn confirm(&mut self) -> Result<(), InvalidTransition> {
        self.advance(OrderState::Placed)
    }

    /// `PLACED → ONGOING`, assigning `worker`.
    pub fn claim(&mut self, worker: UserId) -> Result<(), InvalidTransition> {
        self.advance(OrderState::Ongoing)?;
        self.worker = Some(worker);
        Ok(())
    }

    /// `ONGOING → SERVED`, fixing the charged amount and completion time.
    pub fn serve(&mut self, amount: f64, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        if self.amount.is_some() {
            return Err(InvalidTransition::AmountAlreadySet(self.id));
        }
        self.advance(OrderState::Served)?;
        self.amount = Some(amount);
        self.completed_at = Some(now);
        Ok(())
    }

    fn advance(&mut self, to: OrderState) -> Result<(), InvalidTransition> {
        if self.state.next() != Some(to) {
            return Err(InvalidTransition::State {
                id: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
