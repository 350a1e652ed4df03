//! Order list use case: state -> condition -> page, total fed back to state.

use orderlist_orders::{ConditionBuilder, OrderListState};

use crate::executor::{OrderPage, PagedQueryExecutor};
use crate::order_store::{OrderStore, StorageError};

#[derive(Debug, Clone)]
pub struct OrderListService<S> {
    builder: ConditionBuilder,
    executor: PagedQueryExecutor<S>,
}

impl<S> OrderListService<S>
where
    S: OrderStore,
{
    pub fn new(builder: ConditionBuilder, executor: PagedQueryExecutor<S>) -> Self {
        Self { builder, executor }
    }

    /// Fetch the page `state` currently points at and refresh its total.
    ///
    /// On failure the state is left untouched.
    pub async fn list_orders(
        &self,
        state: &mut OrderListState,
        facility: Option<&str>,
    ) -> Result<OrderPage, StorageError> {
        let condition = self.builder.build(state, facility);
        let page = self
            .executor
            .fetch(&condition, state.view_size(), state.view_index())
            .await?;
        state.record_total(page.total);
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use orderlist_orders::{Dimension, ListUpdate, OrderRecord, PageChange, SelectionChange};

    use crate::order_store::InMemoryOrderStore;

    fn order(n: u32, status: &str, order_type: &str, filter: Option<&str>) -> OrderRecord {
        OrderRecord {
            order_id: format!("WS{n:05}"),
            status_id: status.to_string(),
            order_type_id: order_type.to_string(),
            origin_facility_id: Some("WH1".to_string()),
            order_filters_state_id: filter.map(str::to_string),
            order_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(n.into()),
        }
    }

    fn service(orders: Vec<OrderRecord>) -> OrderListService<Arc<InMemoryOrderStore>> {
        let store = Arc::new(InMemoryOrderStore::with_orders(orders));
        OrderListService::new(ConditionBuilder::new(), PagedQueryExecutor::new(store))
    }

    #[tokio::test]
    async fn listing_refreshes_the_state_total() {
        let service = service((1..=12).map(|n| order(n, "ORDER_SENT", "PURCHASE_ORDER", None)).collect());
        let mut state = OrderListState::default();
        assert_eq!(state.size(), 0);

        // Default selections never fire the dimension groups, so every order matches.
        let page = service.list_orders(&mut state, None).await.unwrap();
        assert_eq!(page.orders.len(), 10);
        assert_eq!(state.size(), 12);
        assert!(state.has_next());

        state.apply_update(&ListUpdate::PageChange(PageChange::new("10", "1")));
        let page = service.list_orders(&mut state, None).await.unwrap();
        assert_eq!(page.orders.len(), 2);
        assert!(!state.has_next());
        assert!(state.has_previous());
    }

    #[tokio::test]
    async fn full_selection_narrows_to_matching_orders() {
        let service = service(vec![
            order(1, "ORDER_CREATED", "SALES_ORDER", Some("filterAuthProblems")),
            order(2, "ORDER_CREATED", "SALES_ORDER", Some("filterInventoryProblems")),
            order(3, "ORDER_CREATED", "PURCHASE_ORDER", Some("filterAuthProblems")),
            order(4, "ORDER_SENT", "SALES_ORDER", Some("filterAuthProblems")),
        ]);
        let mut state = OrderListState::default();
        state.apply_update(&ListUpdate::SelectionChange(
            SelectionChange::new()
                .include(Dimension::Status, "viewcreated")
                .include(Dimension::Type, "view_SALES_ORDER")
                .include(Dimension::Filter, "filterAuthProblems"),
        ));

        let page = service.list_orders(&mut state, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.orders[0].order_id, "WS00001");
    }
}
