//! Order list domain module.
//!
//! Session-scoped filter/pagination state for browsing orders and its
//! translation into a boolean condition tree. Pure domain logic (no IO, no
//! HTTP, no storage).

pub mod builder;
pub mod catalog;
pub mod command;
pub mod condition;
pub mod record;
pub mod state;

pub use builder::{ConditionBuilder, FilterGroupSource};
pub use catalog::{Catalog, Dimension, FILTER_CATALOG, STATUS_CATALOG, TYPE_CATALOG};
pub use command::{
    CHANGE_MODE_PARAM, INCLUDE_MARKER, ListUpdate, PageChange, SelectionChange, VIEW_INDEX_PARAM,
    VIEW_SIZE_PARAM,
};
pub use condition::{Condition, JoinOperator, OrderBy, OrderField, SortDirection};
pub use record::OrderRecord;
pub use state::{DEFAULT_VIEW_SIZE, OrderListState, PaginationParseError, SelectionMap};
