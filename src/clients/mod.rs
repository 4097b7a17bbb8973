//! Type-safe front doors to the running actors.

pub mod order_client;

pub use order_client::*;
