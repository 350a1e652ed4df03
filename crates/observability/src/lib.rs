//! Tracing/logging setup shared by the binaries.

/// Directives used when `RUST_LOG` is not set. sqlx logs every statement at
/// `info`, which would drown the cursor traffic of each fetch.
pub const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// Initialize process-wide tracing.
pub fn init() {
    tracing::init(DEFAULT_DIRECTIVES);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
