use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use orderlist_orders::{Condition, OrderBy, OrderRecord};

use super::r#trait::{OrderCursor, OrderStore, StorageError};

/// In-memory order store.
///
/// Intended for tests/dev. Each cursor works on a filtered, sorted snapshot
/// taken when it is opened.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<OrderRecord>>,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = OrderRecord>) -> Self {
        Self {
            orders: RwLock::new(orders.into_iter().collect()),
            open_cursors: Arc::default(),
        }
    }

    pub fn insert(&self, order: OrderRecord) {
        if let Ok(mut orders) = self.orders.write() {
            orders.push(order);
        }
    }

    /// Cursors opened and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn open_cursor(
        &self,
        condition: &Condition,
        order_by: &[OrderBy],
    ) -> Result<Box<dyn OrderCursor>, StorageError> {
        let mut rows: Vec<OrderRecord> = {
            let orders = self
                .orders
                .read()
                .map_err(|_| StorageError::Open("lock poisoned".to_string()))?;
            orders.iter().filter(|o| condition.matches(o)).cloned().collect()
        };
        rows.sort_by(|a, b| a.cmp_by(b, order_by));

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryCursor {
            rows,
            open_cursors: Some(self.open_cursors.clone()),
        }))
    }
}

struct InMemoryCursor {
    rows: Vec<OrderRecord>,
    // `None` once closed.
    open_cursors: Option<Arc<AtomicUsize>>,
}

impl InMemoryCursor {
    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.open_cursors.is_none() {
            return Err(StorageError::Scroll("cursor already closed".to_string()));
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(counter) = self.open_cursors.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait::async_trait]
impl OrderCursor for InMemoryCursor {
    async fn partial_list(&mut self, start: u64, count: u64) -> Result<Vec<OrderRecord>, StorageError> {
        self.ensure_open()?;
        Ok(self
            .rows
            .iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(usize::try_from(count).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn last(&mut self) -> Result<Option<u64>, StorageError> {
        self.ensure_open()?;
        Ok((self.rows.len() as u64).checked_sub(1))
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.release();
        Ok(())
    }
}

// A fetch abandoned mid-flight never reaches `close`.
impl Drop for InMemoryCursor {
    fn drop(&mut self) {
        self.release();
    }
}
