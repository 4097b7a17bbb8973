//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber. Everything else in the crate
//! only emits events through the `tracing` macros.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: start (with the number of rebuilt assignments) and shutdown
//! - **Store Operations**: every query at `debug`, every write at `info`
//! - **Order Transitions**: draft updated, placed, claimed, served
//! - **Rejections**: the operation, the caller and the reason, at `warn`
//! - **Notifications**: delivered at `debug`, dropped at `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Transitions and lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Include store queries and request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the store
//! RUST_LOG=order_lifecycle::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Store started size=0
//! INFO Worker assignments rebuilt size=0
//! INFO Order actor started active=0
//! INFO Saved order_id=order_1 state=DRAFT size=1
//! INFO Draft updated order_id=order_1 items=1
//! INFO Saved order_id=order_1 state=PLACED size=1
//! INFO Order placed order_id=order_1
//! INFO Saved order_id=order_1 from=PLACED to=ONGOING
//! INFO Order claimed order_id=order_1 worker=user_2
//! INFO Saved order_id=order_1 from=ONGOING to=SERVED
//! INFO Order served order_id=order_1 amount=22.0
//! ```
//!
//! The actors run in their own tasks; client-side spans (`compose_order`, `claim_next_order`,
//! …) carry the caller as `user` for events emitted on the calling side.

/// Initializes the tracing subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
