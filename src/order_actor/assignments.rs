//! # Worker Assignments
//!
//! The in-memory index from worker to the order they are fulfilling. It is derived
//! state: the store is the source of truth and [`WorkerAssignments::rebuild`] recreates
//! the index from every ONGOING order. Owned by the order actor's task, so each
//! check-then-insert and check-then-remove runs without interleaving.

use crate::framework::OrderStore;
use crate::model::{Order, OrderId, OrderState, UserId};
use crate::order_actor::OrderError;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
pub struct WorkerAssignments {
    active: HashMap<UserId, Order>,
}

impl WorkerAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from scratch out of the store's ONGOING orders.
    ///
    /// Fails when an ONGOING order has no worker or a worker holds two of them, since
    /// the index could not mirror such a store.
    pub async fn rebuild(store: &dyn OrderStore) -> Result<Self, OrderError> {
        let ongoing = store.find_ongoing().await?;
        let mut assignments = Self::new();
        for order in ongoing {
            assignments.restore(order)?;
        }
        info!(size = assignments.len(), "Worker assignments rebuilt");
        Ok(assignments)
    }

    fn restore(&mut self, order: Order) -> Result<(), OrderError> {
        if order.state != OrderState::Ongoing {
            return Err(OrderError::InvariantViolation(format!(
                "{} is {}, only ONGOING orders are assigned",
                order.id, order.state
            )));
        }
        let worker = order.worker.ok_or_else(|| {
            OrderError::InvariantViolation(format!("ONGOING {} has no worker", order.id))
        })?;
        self.try_assign(worker, order)
    }

    /// The order `worker` is fulfilling, if any.
    pub fn get(&self, worker: &UserId) -> Option<&Order> {
        self.active.get(worker)
    }

    /// Records `order` for `worker` unless the worker already has one.
    pub fn try_assign(&mut self, worker: UserId, order: Order) -> Result<(), OrderError> {
        if let Some(current) = self.active.get(&worker) {
            return Err(OrderError::InvariantViolation(format!(
                "{worker} is already working on {}",
                current.id
            )));
        }
        self.active.insert(worker, order);
        Ok(())
    }

    /// Removes `worker`'s entry, but only if it is for `order_id`.
    pub fn release(&mut self, worker: &UserId, order_id: OrderId) -> Option<Order> {
        match self.active.get(worker) {
            Some(current) if current.id == order_id => self.active.remove(worker),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Snapshot of every (worker, order id) pair, sorted by worker.
    pub fn entries(&self) -> Vec<(UserId, OrderId)> {
        let mut entries: Vec<_> = self.active.iter().map(|(w, o)| (*w, o.id)).collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockStore;
    use crate::framework::FrameworkError;
    use chrono::Utc;

    fn ongoing(id: u32, worker: Option<UserId>) -> Order {
        let mut order = Order::draft(UserId(100), Utc::now());
        order.id = OrderId(id);
        order.state = OrderState::Ongoing;
        order.worker = worker;
        order
    }

    #[test]
    fn test_one_assignment_per_worker() {
        let mut assignments = WorkerAssignments::new();
        assignments.try_assign(UserId(1), ongoing(1, Some(UserId(1)))).unwrap();

        let second = assignments.try_assign(UserId(1), ongoing(2, Some(UserId(1))));
        assert!(matches!(second, Err(OrderError::InvariantViolation(_))));
        assert_eq!(assignments.get(&UserId(1)).map(|o| o.id), Some(OrderId(1)));
        assert_eq!(assignments.len(), 1);
    }

    #[test]
    fn test_release_requires_matching_order() {
        let mut assignments = WorkerAssignments::new();
        assignments.try_assign(UserId(1), ongoing(1, Some(UserId(1)))).unwrap();

        assert!(assignments.release(&UserId(1), OrderId(2)).is_none());
        assert_eq!(assignments.get(&UserId(1)).map(|o| o.id), Some(OrderId(1)));
        assert!(assignments.release(&UserId(2), OrderId(1)).is_none());

        let released = assignments.release(&UserId(1), OrderId(1)).unwrap();
        assert_eq!(released.id, OrderId(1));
        assert!(assignments.is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_mirrors_ongoing_orders() {
        let mut mock = MockStore::new();
        mock.expect_find_ongoing().return_ok(vec![
            ongoing(3, Some(UserId(7))),
            ongoing(5, Some(UserId(8))),
        ]);
        let store = mock.client();

        let assignments = WorkerAssignments::rebuild(&store).await.unwrap();
        assert_eq!(
            assignments.entries(),
            vec![(UserId(7), OrderId(3)), (UserId(8), OrderId(5))]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_rebuild_rejects_inconsistent_store() {
        let mut mock = MockStore::new();
        mock.expect_find_ongoing().return_ok(vec![
            ongoing(3, Some(UserId(7))),
            ongoing(4, Some(UserId(7))),
        ]);
        mock.expect_find_ongoing().return_ok(vec![ongoing(9, None)]);
        mock.expect_find_ongoing()
            .return_err(FrameworkError::Unavailable("offline".into()));
        let store = mock.client();

        for _ in 0..3 {
            assert!(WorkerAssignments::rebuild(&store).await.is_err());
        }
        mock.verify();
    }
}
