#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Order Lifecycle
//!
//! > **Food orders from draft to served, shared safely between customers and workers.**
//!
//! Customers compose a draft order item by item and confirm it. Workers claim the
//! longest-waiting order, fulfil it and complete it, at which point the charge is
//! computed and the worker is notified.
//!
//! ## 🏗️ Design
//!
//! ### Orders move one way
//! `DRAFT → PLACED → ONGOING → SERVED`, no skips, no reversals. The transitions live on
//! [`Order`](model::Order) itself, so no code path can bypass them.
//!
//! ### The store is the truth
//! All durable reads and writes go through the [`OrderStore`](framework::OrderStore) trait.
//! The worker → active order index kept by the order actor is derived from it and is rebuilt
//! from the ONGOING orders every time the actor starts.
//!
//! ### One actor, one request at a time
//! The [`OrderActor`](order_actor::OrderActor) owns the index and processes requests
//! sequentially. "Is this worker free?" and "record the claim" therefore cannot interleave
//! with another claim by the same worker. The store's conditional save keeps two workers
//! from taking the same order.
//!
//! ### Failures are values
//! Every operation returns `Result<_, OrderError>`; callers match on
//! [`OrderError`](order_actor::OrderError). Completion notifications are the one exception:
//! they are best-effort and their failures are only logged.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - orders, items, users and capabilities
//! - [`framework`] - the store contract, the in-memory store actor and its mock
//! - [`order_actor`] - the lifecycle manager and its worker assignments
//! - [`clients`] - the typed [`OrderClient`](clients::OrderClient)
//! - [`pricing`] - the discount rules
//! - [`auth`] - the capability gate
//! - [`notify`] - completion notifications
//! - [`config`] - environment-driven settings
//! - [`lifecycle`] - wiring, startup, shutdown and tracing setup
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod auth;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod pricing;
