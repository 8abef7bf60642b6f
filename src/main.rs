use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ecocart_api::api::{create_router, AppState};
use ecocart_api::config::Config;
use ecocart_api::engine::RecommendationEngine;
use ecocart_api::services::{bundles, loader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Build the engine once up front; requests only ever read it
    let lines = loader::load_transaction_lines(Path::new(&config.transactions_path))
        .with_context(|| format!("failed to load transaction log {}", config.transactions_path))?;
    let engine = RecommendationEngine::new(&lines);
    tracing::info!(
        products = engine.all_products().len(),
        transactions = engine.total_transactions(),
        "recommendation engine ready"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, engine, bundles::curated_bundles());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
