//! # Order Lifecycle Demo
//!
//! One customer orders three pizzas, one worker claims and serves them.

use order_lifecycle::config::SystemConfig;
use order_lifecycle::lifecycle::{setup_tracing, OrderSystem};
use order_lifecycle::framework::OrderStore;
use order_lifecycle::model::{Item, ItemId, OrderState, User, UserId};
use order_lifecycle::order_actor::OrderError;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenvy::dotenv();
    setup_tracing();

    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting order system");
    let system = OrderSystem::new(&config);

    let alice = User::customer(UserId(1), "Alice", "alice@example.com");
    let bob = User::worker(UserId(2), "Bob", "bob@example.com");

    let menu = [
        Item::new(ItemId(1), 10.0, ["mozzarella", "basil"]),
        Item::new(ItemId(2), 8.0, ["pineapple", "ham"]),
        Item::new(ItemId(3), 12.0, ["salami"]),
    ];

    let span = tracing::info_span!("customer", user = %alice.id);
    async {
        for item in menu {
            let draft = system
                .order_client
                .compose_order(&alice, item)
                .await
                .map_err(|e| e.to_string())?;
            info!(order_id = %draft.id, items = draft.items.len(), "Item added");
        }
        system
            .order_client
            .confirm_order(&alice)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("worker", user = %bob.id);
    let outcome = async {
        let Some(order) = system.order_client.claim_next_order(&bob).await? else {
            info!("Nothing to do");
            return Ok::<(), OrderError>(());
        };
        info!(order_id = %order.id, "Working on order");
        system.order_client.complete_order(&bob, order.id).await
    }
    .instrument(span)
    .await;

    if let Err(e) = outcome {
        error!(error = %e, "Order processing failed");
    }

    if let Some(store) = &system.store_client {
        let served = store
            .count(Some(OrderState::Served))
            .await
            .map_err(|e| e.to_string())?;
        info!(served, "Orders served");
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
