use std::{sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use redseeker_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::providers::RecommendApiProvider,
};

const DEFAULT_LOG_FILTER: &str = "redseeker_api=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?).await;
            tracing::info!("Candidate caching enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let provider = RecommendApiProvider::new(
        config.recommend_api_url.clone(),
        config.default_city.clone(),
        Duration::from_millis(config.upstream_timeout_ms),
        cache,
        config.candidate_cache_ttl,
    )?;

    let state = Arc::new(AppState::new(Arc::new(provider), &config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        upstream = %config.recommend_api_url,
        strategy = ?config.selection_strategy,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
