use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderlist_infra::StorageError;

pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    match err {
        StorageError::Timeout(_) => {
            json_error(StatusCode::GATEWAY_TIMEOUT, "storage_timeout", err.to_string())
        }
        StorageError::Open(_) | StorageError::Scroll(_) | StorageError::Close(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
