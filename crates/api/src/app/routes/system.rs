use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use orderlist_infra::SessionStore;

use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Discard the session's order list state; the next request starts over.
pub async fn end_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> StatusCode {
    let existed = services.sessions.end_session(session.session_id());
    tracing::debug!(session_id = %session.session_id(), existed, "session ended");
    StatusCode::NO_CONTENT
}
