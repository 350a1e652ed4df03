use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use orderlist_orders::{Condition, OrderBy, OrderRecord};

/// Order store access failure.
///
/// Not retried; surfaced to the caller as a failed fetch.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open order cursor: {0}")]
    Open(String),

    #[error("failed to scroll order cursor: {0}")]
    Scroll(String),

    #[error("failed to close order cursor: {0}")]
    Close(String),

    #[error("order fetch exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

/// Short-lived, single-use cursor over an ordered result set.
///
/// A cursor must be closed by whoever opened it, on success and failure
/// paths alike. It is never shared between callers. Dropping an unclosed
/// cursor (an abandoned fetch) must still release it.
#[async_trait::async_trait]
pub trait OrderCursor: Send {
    /// Rows at 0-based positions `[start, start + count)`; fewer if the
    /// result set ends first. Leaves the cursor on the last row read.
    async fn partial_list(&mut self, start: u64, count: u64) -> Result<Vec<OrderRecord>, StorageError>;

    /// Move to the final row and return its 0-based index (`None` when the
    /// result set is empty). Costs a traversal of the whole result set.
    async fn last(&mut self) -> Result<Option<u64>, StorageError>;

    /// Release the cursor. Calling it more than once is a no-op.
    async fn close(&mut self) -> Result<(), StorageError>;
}

/// Condition-based order finder.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a scrollable cursor over orders matching `condition`, sorted by
    /// `order_by`.
    async fn open_cursor(
        &self,
        condition: &Condition,
        order_by: &[OrderBy],
    ) -> Result<Box<dyn OrderCursor>, StorageError>;
}

#[async_trait::async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn open_cursor(
        &self,
        condition: &Condition,
        order_by: &[OrderBy],
    ) -> Result<Box<dyn OrderCursor>, StorageError> {
        (**self).open_cursor(condition, order_by).await
    }
}
