use anyhow::Context;

use orderlist_infra::OrderListSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orderlist_observability::init();

    let settings = OrderListSettings::load().context("failed to load order list settings")?;
    let app = orderlist_api::app::build_app(&settings).await?;

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
