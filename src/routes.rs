//! Top-level router configuration combining API and public routes.
//!
//! # Route Structure
//!
//! - `GET  /feed.xml`                  - Public RSS feed (public)
//! - `GET  /press-releases/{id}/view`  - Public press release page
//! - `GET  /health`                    - Health check: DB, cache (public)
//! - `/api/*`                          - REST API (Bearer token required)
//! - `/static/*`                       - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, public_feed_handler};
use crate::api::middleware::rate_limit::{self, Tier};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use crate::web;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = rate_limit::apply(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        Tier::Secure,
        behind_proxy,
    );

    let public_router = rate_limit::apply(
        web::routes::public_routes().route("/feed.xml", get(public_feed_handler)),
        Tier::Public,
        behind_proxy,
    );

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(public_router)
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
