use anyhow::Context;

use worksphere_api::{app, ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    worksphere_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = app::build_app(&config).await.context("failed to wire services")?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
