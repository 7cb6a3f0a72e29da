use anyhow::Context;
use immo_scout::{
    build_router, config::Config, scrapers::HttpFetcher, store::ListingStore, AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    info!("🏠 Immo Scout - Marseille listing tracker");
    info!("==========================================");

    let store = ListingStore::open(&config.data_path)
        .await
        .with_context(|| format!("Failed to open store at {}", config.data_path.display()))?;
    info!("💾 Store loaded from {}", config.data_path.display());

    let fetcher = HttpFetcher::from_config(&config)?;

    if config.api_key.is_none() {
        warn!("API_KEY is not set, mutating routes are open");
    }

    let state = AppState::new(Arc::new(store), Arc::new(fetcher), config.api_key.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("✅ Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
