use axum::{routing::delete, Router};

pub mod orders;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/session", delete(system::end_session))
        .nest("/orders", orders::router())
}
