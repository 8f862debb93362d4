mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;

use rankwire::infrastructure::cache::{CacheResult, CacheService};
use rankwire::infrastructure::syndication::DryRunSubmitter;

/// Cache whose backend never answers a ping.
struct UnreachableCache;

#[async_trait]
impl CacheService for UnreachableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[sqlx::test]
async fn test_health_degraded_when_cache_unreachable(pool: PgPool) {
    let state =
        common::create_test_state_with(pool, Arc::new(UnreachableCache), Arc::new(DryRunSubmitter));
    let server = TestServer::new(common::app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}

#[sqlx::test]
async fn test_health_does_not_require_token(pool: PgPool) {
    let server = common::make_server(pool);

    server.get("/health").await.assert_status_ok();
}
