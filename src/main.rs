use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_rec_api::{
    create_router,
    db::{create_pool, create_redis_client, Cache, PgStore},
    services::{providers::TmdbProvider, MovieService, RandomSeedSelector},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_rec_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let store = Arc::new(PgStore::new(pool));

    let (cache, cache_handle) = match config.redis_url.as_deref() {
        Some(url) => match Cache::new(create_redis_client(url)?).await {
            Ok((cache, handle)) => {
                tracing::info!("Upstream response caching enabled");
                (Some(cache), Some(handle))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unreachable, upstream response caching disabled");
                (None, None)
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, upstream response caching disabled");
            (None, None)
        }
    };

    let provider = Arc::new(TmdbProvider::new(&config, cache));
    let movies = MovieService::new(provider, store.clone(), store, Arc::new(RandomSeedSelector));
    let app = create_router(AppState::new(movies));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
