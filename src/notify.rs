//! # Completion Notifications
//!
//! Once an order is served the worker is sent a confirmation. Delivery is best-effort:
//! [`notify_best_effort`] bounds the attempt with a timeout, logs any failure and
//! discards it. It is never retried and never reaches the caller of `complete_order`.

use crate::model::{Order, User};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Errors a [`Notifier`] may report. They are logged, never propagated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Notification timed out")]
    Timeout,
}

/// Outbound channel for "order served" confirmations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_completion(&self, worker: &User, order: &Order) -> Result<(), NotifyError>;
}

/// Default notifier: records the confirmation as a structured log event addressed to
/// the worker's email.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_completion(&self, worker: &User, order: &Order) -> Result<(), NotifyError> {
        info!(
            to = %worker.email,
            order_id = %order.id,
            amount = order.amount.unwrap_or_default(),
            "Order served confirmation"
        );
        Ok(())
    }
}

/// Sends the confirmation, swallowing any failure or timeout.
pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    worker: &User,
    order: &Order,
    timeout: Duration,
) {
    let outcome = match tokio::time::timeout(timeout, notifier.notify_completion(worker, order)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::Timeout),
    };
    match outcome {
        Ok(()) => debug!(order_id = %order.id, "Notification sent"),
        Err(e) => warn!(order_id = %order.id, error = %e, "Notification dropped"),
    }
}
