//! HTTP API: order list browsing over per-session state.

pub mod app;
pub mod context;
pub mod middleware;
