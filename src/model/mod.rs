//! Pure data structures shared by the store, the order actor and the clients.

pub mod order;
pub mod user;

pub use order::*;
pub use user::*;
