//! Postgres-backed order store.
//!
//! Each fetch runs inside its own read-only transaction holding a
//! server-side `SCROLL` cursor over `order_header`:
//!
//! 1. `DECLARE order_list_cursor SCROLL CURSOR FOR SELECT ... WHERE ... ORDER BY ...`
//! 2. `MOVE ABSOLUTE start` + `FETCH FORWARD count` for the page window
//! 3. `MOVE ABSOLUTE 0` + `MOVE FORWARD ALL` for the total; the command tag
//!    reports how many rows were traversed
//! 4. `CLOSE` + `COMMIT`
//!
//! A cursor dropped without `close` rolls its transaction back, which also
//! releases the server-side cursor.

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder, Row, Transaction};
use std::sync::Arc;

use orderlist_orders::{Condition, OrderBy, OrderField, OrderRecord, SortDirection};

use super::r#trait::{OrderCursor, OrderStore, StorageError};

const CURSOR_NAME: &str = "order_list_cursor";

const SELECT_COLUMNS: &str = "SELECT order_id, status_id, order_type_id, origin_facility_id, \
                              order_filters_state_id, order_date FROM order_header";

#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    async fn open_cursor(
        &self,
        condition: &Condition,
        order_by: &[OrderBy],
    ) -> Result<Box<dyn OrderCursor>, StorageError> {
        let mut query = declare_cursor_query(condition, order_by)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(StorageError::Open, "begin", e))?;

        (&mut *tx)
            .execute(sqlx::raw_sql("SET TRANSACTION READ ONLY"))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Open, "set_read_only", e))?;

        (&mut *tx)
            .execute(query.build())
            .await
            .map_err(|e| map_sqlx_error(StorageError::Open, "declare_cursor", e))?;

        Ok(Box::new(PostgresOrderCursor { tx: Some(tx) }))
    }
}

/// Build the `DECLARE ... CURSOR FOR SELECT` statement with bound values.
fn declare_cursor_query(
    condition: &Condition,
    order_by: &[OrderBy],
) -> Result<QueryBuilder<'static, Postgres>, StorageError> {
    let mut query = QueryBuilder::new(format!("DECLARE {CURSOR_NAME} SCROLL CURSOR FOR "));
    query.push(SELECT_COLUMNS);

    if !condition.is_unconditioned() {
        query.push(" WHERE ");
        push_condition(&mut query, condition)?;
    }

    if !order_by.is_empty() {
        query.push(" ORDER BY ");
        for (idx, key) in order_by.iter().enumerate() {
            if idx > 0 {
                query.push(", ");
            }
            query.push(key.field.column());
            query.push(match key.direction {
                SortDirection::Asc => " ASC",
                SortDirection::Desc => " DESC",
            });
        }
    }

    Ok(query)
}

fn push_condition(
    query: &mut QueryBuilder<'static, Postgres>,
    condition: &Condition,
) -> Result<(), StorageError> {
    match condition {
        Condition::Equals {
            field: OrderField::OrderDate,
            value,
        } => {
            let at: DateTime<Utc> = value
                .parse()
                .map_err(|e| StorageError::Open(format!("invalid orderDate literal [{value}]: {e}")))?;
            query.push("order_date = ");
            query.push_bind(at);
        }
        Condition::Equals { field, value } => {
            query.push(field.column());
            query.push(" = ");
            query.push_bind(value.clone());
        }
        Condition::List { conditions, .. } if conditions.is_empty() => {
            query.push("TRUE");
        }
        Condition::List {
            operator,
            conditions,
        } => {
            query.push("(");
            for (idx, c) in conditions.iter().enumerate() {
                if idx > 0 {
                    query.push(format!(" {} ", operator.keyword()));
                }
                push_condition(query, c)?;
            }
            query.push(")");
        }
    }
    Ok(())
}

struct PostgresOrderCursor {
    // `None` once closed.
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresOrderCursor {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StorageError> {
        self.tx
            .as_mut()
            .ok_or_else(|| StorageError::Scroll("cursor already closed".to_string()))
    }
}

#[async_trait::async_trait]
impl OrderCursor for PostgresOrderCursor {
    async fn partial_list(&mut self, start: u64, count: u64) -> Result<Vec<OrderRecord>, StorageError> {
        let tx = self.tx()?;

        // Row `start` (1-based) is the one just before the window.
        let move_to = format!("MOVE ABSOLUTE {start} IN {CURSOR_NAME}");
        (&mut **tx)
            .execute(sqlx::raw_sql(&move_to))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Scroll, "move_absolute", e))?;

        let fetch = format!("FETCH FORWARD {count} FROM {CURSOR_NAME}");
        let rows = (&mut **tx)
            .fetch_all(sqlx::raw_sql(&fetch))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Scroll, "fetch_forward", e))?;

        rows.iter()
            .map(|row| {
                OrderHeaderRow::from_row(row)
                    .map(Into::into)
                    .map_err(|e| StorageError::Scroll(format!("failed to decode order row: {e}")))
            })
            .collect()
    }

    async fn last(&mut self) -> Result<Option<u64>, StorageError> {
        let tx = self.tx()?;

        let rewind = format!("MOVE ABSOLUTE 0 IN {CURSOR_NAME}");
        (&mut **tx)
            .execute(sqlx::raw_sql(&rewind))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Scroll, "rewind", e))?;

        let to_end = format!("MOVE FORWARD ALL IN {CURSOR_NAME}");
        let traversed = (&mut **tx)
            .execute(sqlx::raw_sql(&to_end))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Scroll, "move_forward_all", e))?
            .rows_affected();

        Ok(traversed.checked_sub(1))
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        let Some(mut tx) = self.tx.take() else {
            return Ok(());
        };

        let close = format!("CLOSE {CURSOR_NAME}");
        (&mut *tx)
            .execute(sqlx::raw_sql(&close))
            .await
            .map_err(|e| map_sqlx_error(StorageError::Close, "close_cursor", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(StorageError::Close, "commit", e))
    }
}

#[derive(Debug)]
struct OrderHeaderRow {
    order_id: String,
    status_id: String,
    order_type_id: String,
    origin_facility_id: Option<String>,
    order_filters_state_id: Option<String>,
    order_date: DateTime<Utc>,
}

impl OrderHeaderRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderHeaderRow {
            order_id: row.try_get("order_id")?,
            status_id: row.try_get("status_id")?,
            order_type_id: row.try_get("order_type_id")?,
            origin_facility_id: row.try_get("origin_facility_id")?,
            order_filters_state_id: row.try_get("order_filters_state_id")?,
            order_date: row.try_get("order_date")?,
        })
    }
}

impl From<OrderHeaderRow> for OrderRecord {
    fn from(row: OrderHeaderRow) -> Self {
        OrderRecord {
            order_id: row.order_id,
            status_id: row.status_id,
            order_type_id: row.order_type_id,
            origin_facility_id: row.origin_facility_id,
            order_filters_state_id: row.order_filters_state_id,
            order_date: row.order_date,
        }
    }
}

fn map_sqlx_error(
    kind: fn(String) -> StorageError,
    operation: &str,
    err: sqlx::Error,
) -> StorageError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            kind(format!("{operation}: database error [{code}]: {}", db_err.message()))
        }
        sqlx::Error::PoolTimedOut => kind(format!("{operation}: connection pool timed out")),
        sqlx::Error::PoolClosed => kind(format!("{operation}: connection pool closed")),
        other => kind(format!("{operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconditioned_fetch_has_no_where_clause() {
        let query = declare_cursor_query(&Condition::unconditioned(), &OrderBy::order_list_default()).unwrap();
        assert_eq!(
            query.sql(),
            "DECLARE order_list_cursor SCROLL CURSOR FOR SELECT order_id, status_id, order_type_id, \
             origin_facility_id, order_filters_state_id, order_date FROM order_header ORDER BY order_date DESC"
        );
    }

    #[test]
    fn condition_tree_renders_as_bound_predicates() {
        let cond = Condition::and(vec![
            Condition::or(vec![
                Condition::equals(OrderField::StatusId, "ORDER_CREATED"),
                Condition::equals(OrderField::StatusId, "ORDER_APPROVED"),
            ]),
            Condition::equals(OrderField::OriginFacilityId, "WH1"),
        ]);
        let query = declare_cursor_query(&cond, &OrderBy::order_list_default()).unwrap();
        assert!(query.sql().ends_with(
            "FROM order_header WHERE ((status_id = $1 OR status_id = $2) AND origin_facility_id = $3) \
             ORDER BY order_date DESC"
        ));
    }

    #[test]
    fn malformed_order_date_literal_is_rejected() {
        let cond = Condition::equals(OrderField::OrderDate, "yesterday");
        assert!(matches!(
            declare_cursor_query(&cond, &[]),
            Err(StorageError::Open(msg)) if msg.contains("orderDate")
        ));
    }

    #[tokio::test]
    async fn unreachable_database_fails_to_open() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(500))
            .connect_lazy("postgres://orderlist@127.0.0.1:1/orders")
            .unwrap();
        let store = PostgresOrderStore::new(pool);

        let opened = store
            .open_cursor(&Condition::unconditioned(), &OrderBy::order_list_default())
            .await;

        match opened {
            Err(StorageError::Open(msg)) => assert!(msg.starts_with("begin"), "{msg}"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opened a cursor without a database"),
        }
    }
}
