//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and aggregator setup, and the Axum
//! server lifecycle.

use crate::application::services::{
    AuthService, EntityService, FeedService, PressReleaseService,
};
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    PgEntityRepository, PgPressReleaseRepository, PgTokenRepository,
};
use crate::infrastructure::syndication::{DryRunSubmitter, FeedSubmitter, HttpFeedSubmitter};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Aggregator submitter (HTTP, or dry-run when no endpoint is configured)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = connect_cache(&config).await;
    let submitter = build_submitter(&config)?;

    let state = build_state(Arc::new(pool), cache, submitter, &config);
    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Wires repositories and services into the shared state.
pub fn build_state(
    pool: Arc<PgPool>,
    cache: Arc<dyn CacheService>,
    submitter: Arc<dyn FeedSubmitter>,
    config: &Config,
) -> AppState {
    let entity_repo = Arc::new(PgEntityRepository::new(pool.clone()));
    let release_repo = Arc::new(PgPressReleaseRepository::new(pool.clone()));
    let token_repo = Arc::new(PgTokenRepository::new(pool.clone()));

    AppState {
        entity_service: Arc::new(EntityService::new(entity_repo.clone())),
        press_release_service: Arc::new(PressReleaseService::new(
            release_repo.clone(),
            entity_repo.clone(),
        )),
        feed_service: Arc::new(FeedService::new(
            release_repo,
            entity_repo,
            cache.clone(),
            submitter,
            config.feed.public_base_url.clone(),
            config.feed.cache_ttl_seconds,
        )),
        auth_service: Arc::new(AuthService::new(
            token_repo,
            config.token_signing_secret.clone(),
        )),
        cache,
        db: pool,
    }
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.feed.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn build_submitter(config: &Config) -> Result<Arc<dyn FeedSubmitter>> {
    match &config.aggregator.endpoint {
        Some(endpoint) => {
            let submitter = HttpFeedSubmitter::new(endpoint.clone(), config.aggregator.timeout)
            .context("Failed to build aggregator HTTP client")?;
            tracing::info!("Aggregator submission enabled");
            Ok(Arc::new(submitter))
        }
        None => {
            tracing::info!("Aggregator endpoint not configured, submissions run in test mode");
            Ok(Arc::new(DryRunSubmitter))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
