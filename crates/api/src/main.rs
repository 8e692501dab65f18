use std::sync::Arc;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storekeep_observability::init();

    let addr = std::env::var("STOREKEEP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let services = Arc::new(storekeep_api::app::services::build_services());
    let app = storekeep_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
