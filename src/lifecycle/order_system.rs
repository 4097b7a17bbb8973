use crate::clients::OrderClient;
use crate::config::SystemConfig;
use crate::framework::{OrderStore, StoreActor, StoreClient};
use crate::notify::{LogNotifier, Notifier};
use crate::order_actor::{self, OrderContext, OrderError};
use crate::pricing::PricingEngine;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator for the order lifecycle.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting the store (when bundled) and the order actor, and
///   stopping them again
/// - **Dependency Wiring**: Handing the store, notifier and pricing rules to the order actor
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&SystemConfig::default());
///
/// let draft = system.order_client.compose_order(&alice, pizza).await?;
/// system.order_client.confirm_order(&alice).await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    /// Client for the bundled in-memory store, absent when the store is external
    pub store_client: Option<StoreClient>,

    order_handle: JoinHandle<Result<(), OrderError>>,
    store_handle: Option<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts an in-memory store, a logging notifier and the order actor.
    pub fn new(config: &SystemConfig) -> Self {
        let (store_actor, store_client) = StoreActor::new(config.store_buffer);
        let store_handle = tokio::spawn(store_actor.run());

        let mut system = Self::with_collaborators(
            config,
            Arc::new(store_client.clone()),
            Arc::new(LogNotifier),
        );
        system.store_client = Some(store_client);
        system.store_handle = Some(store_handle);
        system
    }

    /// Starts the order actor against collaborators owned by the caller.
    ///
    /// The actor rebuilds its worker assignments from `store` before serving requests,
    /// so this is also how a restart is performed.
    pub fn with_collaborators(
        config: &SystemConfig,
        store: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let context = OrderContext {
            pricing: PricingEngine::new(config.marked_topping.clone()),
            notify_timeout: config.notify_timeout,
            ..OrderContext::new(store, notifier)
        };

        let (order_actor, order_client) = order_actor::new(config.order_buffer);
        let order_handle = tokio::spawn(order_actor.run(context));

        Self {
            order_client,
            store_client: None,
            order_handle,
            store_handle: None,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Drops the clients, which closes the actors' channels, then waits for each actor
    /// task. Reports the order actor's startup failure, if it had one.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        match self.order_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(error = %e, "Order actor failed");
                return Err(format!("Order actor failed: {e}"));
            }
            Err(e) => {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        // The order actor held the last other store handle, so the store now winds down.
        drop(self.store_client);
        if let Some(handle) = self.store_handle {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
