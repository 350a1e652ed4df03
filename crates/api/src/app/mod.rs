//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: order store, session store and order list service wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use orderlist_infra::OrderListSettings;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &OrderListSettings) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(settings).await?);
    Ok(build_router(services))
}

/// Router over already-wired services.
pub fn build_router(services: Arc<AppServices>) -> Router {
    // Session-scoped routes: every request resolves (or starts) a session.
    let sessioned = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::session_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(sessioned)
        .layer(ServiceBuilder::new())
}

pub use services::AppServices;
