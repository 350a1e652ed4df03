use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use orderlist_infra::SessionStore;
use orderlist_orders::ListUpdate;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Optional query parameter restricting orders to one origin facility.
pub const FACILITY_PARAM: &str = "facility";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/state", get(get_state))
}

/// Apply the update carried by the query parameters (if any), then fetch
/// the page the session's state points at.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let facility = params
        .get(FACILITY_PARAM)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty());

    let shared = services.sessions.get_or_create(session.session_id());
    let mut state = shared.lock().await;

    if let Some(update) = ListUpdate::from_params(&params) {
        state.apply_update(&update);
    }
    tracing::debug!(session_id = %session.session_id(), "{}", *state);

    match services.orders.list_orders(&mut state, facility).await {
        Ok(page) => Json(dto::order_page_to_json(page, &state)).into_response(),
        Err(e) => {
            tracing::warn!(session_id = %session.session_id(), error = %e, "order fetch failed");
            errors::storage_error_to_response(e)
        }
    }
}

/// Current state of the session. Reading never creates a session; an
/// unknown session reports the state it would start with.
pub async fn get_state(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let state = match services.sessions.get(session.session_id()) {
        Some(shared) => {
            let state = shared.lock().await;
            state.clone()
        }
        None => services.sessions.fresh_state(),
    };
    Json(dto::order_list_state_to_json(&state)).into_response()
}
