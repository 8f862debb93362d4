mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(token))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

async fn publish(server: &TestServer, id: &str) -> Value {
    let response = server
        .post(&format!("/api/press-releases/{id}/publish"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[sqlx::test]
async fn test_requires_token(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    server
        .post("/api/press-releases")
        .json(&json!({ "headline": "Anonymous" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_create_allocates_sequential_identifiers(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let first = create(&server, common::TEST_TOKEN, json!({ "headline": "First" })).await;
    let second = create(&server, common::OTHER_TOKEN, json!({ "headline": "Second" })).await;
    let third = create(&server, common::TEST_TOKEN, json!({ "headline": "Third" })).await;

    assert_eq!(first["pr_id"], "RW10000");
    assert_eq!(second["pr_id"], "RW10001");
    assert_eq!(third["pr_id"], "RW10002");
    assert_eq!(first["status"], "draft");
    assert!(first["published_at"].is_null());
}

#[sqlx::test]
async fn test_create_validation(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let long_headline = "x".repeat(71);
    let response = server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": long_headline }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");

    server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": "   " }))
        .await
        .assert_status_bad_request();

    server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": "Ok", "subheadline": "y".repeat(121) }))
        .await
        .assert_status_bad_request();

    server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": "Ok", "media_contact_email": "not-an-email" }))
        .await
        .assert_status_bad_request();
}

#[sqlx::test]
async fn test_create_with_foreign_entity(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let entity = server
        .post("/api/entities")
        .add_header("Authorization", common::bearer(common::OTHER_TOKEN))
        .json(&json!({ "company_name": "Bob Corp" }))
        .await
        .json::<Value>();

    server
        .post("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": "Borrowed", "entity_id": entity["id"] }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_releases_are_scoped_to_owner(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let release = create(&server, common::TEST_TOKEN, json!({ "headline": "Private" })).await;
    let id = release["id"].as_str().unwrap();

    for path in [
        format!("/api/press-releases/{id}"),
        format!("/api/feed?press_release_id={id}"),
    ] {
        server
            .get(&path)
            .add_header("Authorization", common::bearer(common::OTHER_TOKEN))
            .await
            .assert_status_not_found();
    }

    server
        .post(&format!("/api/press-releases/{id}/publish"))
        .add_header("Authorization", common::bearer(common::OTHER_TOKEN))
        .await
        .assert_status_not_found();

    let list = server
        .get("/api/press-releases")
        .add_header("Authorization", common::bearer(common::OTHER_TOKEN))
        .await
        .json::<Value>();
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[sqlx::test]
async fn test_update_replaces_content_and_keeps_identifier(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let release = create(
        &server,
        common::TEST_TOKEN,
        json!({ "headline": "Draft", "keywords": "ai" }),
    )
    .await;
    let id = release["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/press-releases/{id}"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .json(&json!({ "headline": "Final", "pr_id": "RW1", "status": "published" }))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["headline"], "Final");
    assert!(updated["keywords"].is_null());
    assert_eq!(updated["pr_id"], release["pr_id"]);
    assert_eq!(updated["status"], "draft");
}

#[sqlx::test]
async fn test_publish_report_lifecycle(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let release = create(&server, common::TEST_TOKEN, json!({ "headline": "Launch" })).await;
    let id = release["id"].as_str().unwrap();

    let published = publish(&server, id).await;
    assert_eq!(published["status"], "published");
    let published_at = published["published_at"].clone();
    assert!(!published_at.is_null());

    let reporting = server
        .post(&format!("/api/press-releases/{id}/report"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await;
    reporting.assert_status_ok();
    assert_eq!(reporting.json::<Value>()["status"], "reporting");

    let republished = publish(&server, id).await;
    assert_eq!(republished["status"], "published");
    assert_eq!(republished["published_at"], published_at);
}

#[sqlx::test]
async fn test_list_filters_by_status(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let draft = create(&server, common::TEST_TOKEN, json!({ "headline": "Draft" })).await;
    let live = create(&server, common::TEST_TOKEN, json!({ "headline": "Live" })).await;
    publish(&server, live["id"].as_str().unwrap()).await;

    let all = server
        .get("/api/press-releases")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .json::<Value>();
    assert_eq!(all["items"].as_array().unwrap().len(), 2);

    let published = server
        .get("/api/press-releases?status=published")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .json::<Value>();
    let items = published["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], live["id"]);

    let drafts = server
        .get("/api/press-releases?status=draft")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .json::<Value>();
    assert_eq!(drafts["items"][0]["id"], draft["id"]);

    server
        .get("/api/press-releases?status=archived")
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .assert_status_bad_request();
}

#[sqlx::test]
async fn test_delete_release(pool: PgPool) {
    common::seed_accounts(&pool).await;
    let server = common::make_server(pool);

    let release = create(&server, common::TEST_TOKEN, json!({ "headline": "Gone" })).await;
    create(&server, common::TEST_TOKEN, json!({ "headline": "Kept" })).await;
    let id = release["id"].as_str().unwrap();

    server
        .delete(&format!("/api/press-releases/{id}"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/press-releases/{id}"))
        .add_header("Authorization", common::bearer(common::TEST_TOKEN))
        .await
        .assert_status_not_found();

    let next = create(&server, common::TEST_TOKEN, json!({ "headline": "Next" })).await;
    assert_eq!(next["pr_id"], "RW10002");
}
