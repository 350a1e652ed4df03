use orderlist_infra::OrderPage;
use orderlist_orders::OrderListState;

/// Page of orders plus the pagination flags derived from the refreshed state.
pub fn order_page_to_json(page: OrderPage, state: &OrderListState) -> serde_json::Value {
    serde_json::json!({
        "orders": page.orders,
        "total": page.total,
        "viewIndex": state.view_index(),
        "viewSize": state.view_size(),
        "hasPrevious": state.has_previous(),
        "hasNext": state.has_next(),
    })
}

pub fn order_list_state_to_json(state: &OrderListState) -> serde_json::Value {
    serde_json::json!({
        "state": state,
        "hasAllStatus": state.has_all_status(),
        "hasPrevious": state.has_previous(),
        "hasNext": state.has_next(),
    })
}
