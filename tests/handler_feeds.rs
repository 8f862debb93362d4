mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rankwire::infrastructure::cache::{CacheResult, CacheService};
use rankwire::infrastructure::syndication::DryRunSubmitter;

/// Process-local cache standing in for Redis.
#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

async fn create_release(server: &TestServer, token: &str, body: Value) -> String {
    let response = server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(token))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn publish(server: &TestServer, token: &str, id: &str) {
    server
        .post(&format!("/api/press-releases/{id}/publish"))
        .add_header("Authorization", common::bearer(token))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_public_feed_is_rss(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/feed.xml").await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/rss+xml; charset=utf-8"
    );

    let feed = common::parse_feed(&response.text());
    assert_eq!(feed.rss_attribute("version"), Some("2.0"));
    assert_eq!(feed.channel_field("link"), Some(common::TEST_BASE_URL));
    assert!(feed.items.is_empty());
}

#[sqlx::test]
async fn test_public_feed_lists_published_releases_of_every_user(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let alice = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Alice news" })).await;
    let bob = create_release(&server, common::OTHER_TOKEN, json!({ "headline": "Bob news" })).await;
    create_release(&server, common::TEST_TOKEN, json!({ "headline": "Alice draft" })).await;

    publish(&server, common::TEST_TOKEN, &alice).await;
    publish(&server, common::OTHER_TOKEN, &bob).await;

    let feed = common::parse_feed(&server.get("/feed.xml").await.text());

    let mut titles: Vec<&str> = feed
        .items
        .iter()
        .filter_map(|item| item.field("title"))
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Alice news", "Bob news"]);

    let alice_item = feed
        .items
        .iter()
        .find(|item| item.field("guid") == Some(alice.as_str()))
        .unwrap();
    assert_eq!(
        alice_item.field("link"),
        Some(format!("{}/press-releases/{alice}/view", common::TEST_BASE_URL).as_str())
    );
    assert_eq!(alice_item.guid_is_permalink.as_deref(), Some("false"));
}

#[sqlx::test]
async fn test_public_feed_cache_dropped_on_publish(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let state = common::create_test_state_with(
        pool,
        Arc::new(MemoryCache::default()),
        Arc::new(DryRunSubmitter),
    );
    let server = TestServer::new(common::app(state)).unwrap();

    let id = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Fresh" })).await;

    let before = common::parse_feed(&server.get("/feed.xml").await.text());
    assert!(before.items.is_empty());

    publish(&server, common::TEST_TOKEN, &id).await;

    let after = common::parse_feed(&server.get("/feed.xml").await.text());
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].field("title"), Some("Fresh"));
}

#[sqlx::test]
async fn test_user_feed(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let first = create_release(&server, common::TEST_TOKEN, json!({ "headline": "One" })).await;
    let second = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Two" })).await;
    let foreign = create_release(&server, common::OTHER_TOKEN, json!({ "headline": "Three" })).await;
    publish(&server, common::TEST_TOKEN, &first).await;
    publish(&server, common::TEST_TOKEN, &second).await;
    publish(&server, common::OTHER_TOKEN, &foreign).await;

    let all = server
        .get("/api/feed")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    all.assert_status_ok();
    assert_eq!(common::parse_feed(&all.text()).items.len(), 2);

    let single = server
        .get(&format!("/api/feed?press_release_id={second}"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    let feed = common::parse_feed(&single.text());
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].field("title"), Some("Two"));

    let blank = server
        .get("/api/feed?press_release_id=")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    assert_eq!(common::parse_feed(&blank.text()).items.len(), 2);
}

#[sqlx::test]
async fn test_user_feed_requires_token(pool: PgPool) {
    let server = common::make_server(pool);

    server
        .get("/api/feed")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_submit_published_release(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let submitter = Arc::new(common::RecordingSubmitter::default());
    let state = common::create_test_state_with(
        pool,
        Arc::new(rankwire::infrastructure::cache::NullCache),
        submitter.clone(),
    );
    let server = TestServer::new(common::app(state)).unwrap();

    let id = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Syndicate me" })).await;
    create_release(&server, common::TEST_TOKEN, json!({ "headline": "Not this one" })).await;
    publish(&server, common::TEST_TOKEN, &id).await;

    let response = server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], true);

    let overridden = server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "endpoint": "https://aggregator.example.com/ingest" }))
        .await;
    overridden.assert_status_ok();

    let submissions = submitter.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].1, None);
    assert_eq!(
        submissions[1].1.as_deref(),
        Some("https://aggregator.example.com/ingest")
    );

    let feed = common::parse_feed(&submissions[0].0);
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].field("guid"), Some(id.as_str()));
}

#[sqlx::test]
async fn test_submit_rejections(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let id = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Draft" })).await;

    server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .assert_status_bad_request();

    publish(&server, common::TEST_TOKEN, &id).await;

    server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "endpoint": "not a url" }))
        .await
        .assert_status_bad_request();

    server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::OTHER_TOKEN))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_submit_dry_run_reports_success(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let id = create_release(&server, common::TEST_TOKEN, json!({ "headline": "Dry" })).await;
    publish(&server, common::TEST_TOKEN, &id).await;

    let response = server
        .post(&format!("/api/press-releases/{id}/submit"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], true);
}

#[sqlx::test]
async fn test_view_page(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let id = create_release(
        &server,
        common::TEST_TOKEN,
        json!({
            "headline": "Acme opens lab",
            "lead_paragraph": "Acme today opened a lab.",
            "body_content": "<p>Inside the lab</p>"
        }),
    )
    .await;

    server
        .get(&format!("/press-releases/{id}/view"))
        .await
        .assert_status_not_found();

    publish(&server, common::TEST_TOKEN, &id).await;

    let response = server.get(&format!("/press-releases/{id}/view")).await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("<h1>Acme opens lab</h1>"));
    assert!(html.contains("<p>Inside the lab</p>"));
    assert!(html.contains("RW10000"));

    server
        .get("/press-releases/missing/view")
        .await
        .assert_status_not_found();
}
