use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use orderlist_infra::{
    InMemoryOrderStore, InMemorySessionStore, OrderListService, OrderListSettings, OrderStore,
    PagedQueryExecutor, PostgresOrderStore,
};
use orderlist_orders::ConditionBuilder;

/// Order store behind the API; Postgres or in-memory depending on settings.
pub type DynOrderStore = Arc<dyn OrderStore>;

/// Everything the handlers need, shared across requests.
pub struct AppServices {
    pub sessions: InMemorySessionStore,
    pub orders: OrderListService<DynOrderStore>,
}

impl AppServices {
    pub fn new(store: DynOrderStore, settings: &OrderListSettings) -> Self {
        let builder = ConditionBuilder::new().with_filter_group_source(settings.filter_group_source());
        let executor = PagedQueryExecutor::new(store).with_deadline(settings.query_timeout());

        Self {
            sessions: InMemorySessionStore::new(settings.default_view_size())
                .with_idle_timeout(settings.session_idle_timeout()),
            orders: OrderListService::new(builder, executor),
        }
    }

    /// Services over an in-memory order store (local runs and tests).
    pub fn in_memory(store: InMemoryOrderStore, settings: &OrderListSettings) -> Self {
        Self::new(Arc::new(store), settings)
    }
}

pub async fn build_services(settings: &OrderListSettings) -> anyhow::Result<AppServices> {
    let Some(database_url) = settings.database_url.as_deref() else {
        tracing::warn!("database_url not set; serving orders from an empty in-memory store");
        return Ok(AppServices::in_memory(InMemoryOrderStore::new(), settings));
    };

    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    tracing::info!("serving orders from Postgres");

    Ok(AppServices::new(Arc::new(PostgresOrderStore::new(pool)), settings))
}
