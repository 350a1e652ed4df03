//! Paged fetching over an order store cursor.

use std::time::Duration;

use serde::Serialize;
use tracing::{Span, debug, error, instrument};

use orderlist_orders::{Condition, OrderBy, OrderRecord};

use crate::order_store::{OrderCursor, OrderStore, StorageError};

/// One page of orders plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPage {
    pub orders: Vec<OrderRecord>,
    pub total: u64,
}

/// Runs conditions against an [`OrderStore`] and extracts one page.
///
/// The total is obtained by positioning the cursor on its last row, so each
/// fetch costs a traversal of the full match set (O(total)), not a count
/// query.
#[derive(Debug, Clone)]
pub struct PagedQueryExecutor<S> {
    store: S,
    order_by: Vec<OrderBy>,
    deadline: Option<Duration>,
}

impl<S> PagedQueryExecutor<S>
where
    S: OrderStore,
{
    /// Executor sorting by order date, newest first, with no deadline.
    pub fn new(store: S) -> Self {
        Self {
            store,
            order_by: OrderBy::order_list_default(),
            deadline: None,
        }
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Bound the cursor reads of each fetch. The cursor is still closed when
    /// the deadline fires.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fetch rows `[view_index * view_size, view_index * view_size + view_size)`
    /// of the matches for `condition`, and the total match count.
    #[instrument(skip(self, condition), fields(total = tracing::field::Empty), err)]
    pub async fn fetch(
        &self,
        condition: &Condition,
        view_size: u32,
        view_index: u32,
    ) -> Result<OrderPage, StorageError> {
        debug!(condition = %condition, "opening order list cursor");

        let mut cursor = self.store.open_cursor(condition, &self.order_by).await?;

        let start = u64::from(view_index) * u64::from(view_size);
        let read = read_window(cursor.as_mut(), start, u64::from(view_size));
        let outcome = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, read)
                .await
                .unwrap_or(Err(StorageError::Timeout(deadline))),
            None => read.await,
        };

        let closed = cursor.close().await;

        match (outcome, closed) {
            (Ok(page), Ok(())) => {
                Span::current().record("total", page.total);
                Ok(page)
            }
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                error!(error = %close_err, "failed to close order cursor after fetch error");
                Err(e)
            }
        }
    }
}

async fn read_window(
    cursor: &mut dyn OrderCursor,
    start: u64,
    count: u64,
) -> Result<OrderPage, StorageError> {
    let orders = cursor.partial_list(start, count).await?;
    let total = cursor.last().await?.map_or(0, |last| last + 1);
    Ok(OrderPage { orders, total })
}
