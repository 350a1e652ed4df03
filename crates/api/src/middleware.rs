use std::str::FromStr;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use orderlist_core::SessionId;

use crate::app::errors;
use crate::context::SessionContext;

pub const SESSION_HEADER: &str = "x-session-id";

/// Resolve the caller's session from [`SESSION_HEADER`].
///
/// A missing header starts a new session; the id in use is always echoed
/// back on the response.
pub async fn session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let session = match extract_session(req.headers()) {
        Ok(Some(session_id)) => SessionContext::existing(session_id),
        Ok(None) => SessionContext::started(SessionId::new()),
        Err(message) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_session", message);
        }
    };

    req.extensions_mut().insert(session);

    let mut res = next.run(req).await;
    if session.is_new() {
        tracing::debug!(session_id = %session.session_id(), status = %res.status(), "started new session");
    }
    if let Ok(value) = HeaderValue::from_str(&session.session_id().to_string()) {
        res.headers_mut().insert(SESSION_HEADER, value);
    }
    res
}

fn extract_session(headers: &HeaderMap) -> Result<Option<SessionId>, String> {
    let Some(header) = headers.get(SESSION_HEADER) else {
        return Ok(None);
    };

    let raw = header
        .to_str()
        .map_err(|_| format!("{SESSION_HEADER} must be visible ASCII"))?;
    if raw.trim().is_empty() {
        return Ok(None);
    }

    SessionId::from_str(raw)
        .map(Some)
        .map_err(|e| e.to_string())
}
