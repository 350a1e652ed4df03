//! Order store boundary.
//!
//! The store is an opaque condition-based finder: callers open a scrollable
//! cursor over the orders matching a [`Condition`](orderlist_orders::Condition),
//! read a window from it, position it on the last row to learn the total,
//! and close it.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use r#trait::{OrderCursor, OrderStore, StorageError};
