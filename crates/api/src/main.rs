use std::sync::Arc;

use anyhow::Context;

use bookshelf_api::app::{self, services};
use bookshelf_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookshelf_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");

    let services = services::build_services(&config)
        .await
        .context("failed to initialise stores")?;

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
