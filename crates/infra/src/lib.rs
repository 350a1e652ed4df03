//! Infrastructure layer: order store adapters, paged fetching, session
//! storage and configuration.

pub mod config;
pub mod executor;
pub mod order_store;
pub mod service;
pub mod session_store;

pub use config::{ConfigError, OrderListSettings};
pub use executor::{OrderPage, PagedQueryExecutor};
pub use order_store::{InMemoryOrderStore, OrderCursor, OrderStore, PostgresOrderStore, StorageError};
pub use service::OrderListService;
pub use session_store::{InMemorySessionStore, SessionStore, SharedOrderListState};
