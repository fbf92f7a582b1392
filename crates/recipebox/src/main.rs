use anyhow::Context;
use recipebox::{AppState, Config};
use recipebox_store::RecipeStore;
use salvo::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let store = RecipeStore::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let state = AppState::new(store, config.placeholder_image.clone());
    let service = recipebox::service(&config, state)?;

    tracing::info!("Listening on http://{}", config.listen);
    let acceptor = TcpListener::new(config.listen.clone()).bind().await;
    Server::new(acceptor).serve(service).await;
    Ok(())
}
