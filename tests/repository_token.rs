mod common;

use sqlx::PgPool;
use std::sync::Arc;
use rankwire::domain::repositories::TokenRepository;
use rankwire::error::AppError;
use rankwire::infrastructure::persistence::PgTokenRepository;

async fn repo(pool: &PgPool) -> PgTokenRepository {
    common::create_test_user(pool, common::TEST_USER).await;
    PgTokenRepository::new(Arc::new(pool.clone()))
}

#[sqlx::test]
async fn test_create_token(pool: PgPool) {
    let repo = repo(&pool).await;

    let token = repo
        .create_token(common::TEST_USER, "test-token", "hash123")
        .await
        .unwrap();

    assert_eq!(token.user_id, common::TEST_USER);
    assert_eq!(token.name, "test-token");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
async fn test_create_token_for_unknown_user(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let result = repo.create_token("nobody", "orphan", "orphanhash").await;

    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[sqlx::test]
async fn test_create_token_duplicate_name(pool: PgPool) {
    let repo = repo(&pool).await;

    repo.create_token(common::TEST_USER, "same", "hash1")
        .await
        .unwrap();
    let result = repo.create_token(common::TEST_USER, "same", "hash2").await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_find_user_by_token(pool: PgPool) {
    let repo = repo(&pool).await;

    repo.create_token(common::TEST_USER, "valid-token", "validhash")
        .await
        .unwrap();

    let user = repo.find_user_by_token("validhash").await.unwrap();

    assert_eq!(user.as_deref(), Some(common::TEST_USER));
}

#[sqlx::test]
async fn test_find_user_by_unknown_token(pool: PgPool) {
    let repo = repo(&pool).await;

    assert!(repo.find_user_by_token("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoked_token_resolves_to_nobody(pool: PgPool) {
    let repo = repo(&pool).await;

    let token = repo
        .create_token(common::TEST_USER, "revoked-token", "revokedhash")
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_user_by_token("revokedhash").await.unwrap().is_none());

    let stored = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(stored.revoked_at.is_some());
}

#[sqlx::test]
async fn test_revoke_already_revoked(pool: PgPool) {
    let repo = repo(&pool).await;

    let token = repo
        .create_token(common::TEST_USER, "double-revoke", "doublehash")
        .await
        .unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let first = repo.find_by_id(token.id).await.unwrap().unwrap().revoked_at;

    repo.revoke_token(token.id).await.unwrap();
    let second = repo.find_by_id(token.id).await.unwrap().unwrap().revoked_at;

    assert_eq!(first, second);
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let repo = repo(&pool).await;

    let token = repo
        .create_token(common::TEST_USER, "update-token", "updatehash")
        .await
        .unwrap();

    repo.update_last_used("updatehash").await.unwrap();

    let last_used = sqlx::query_scalar::<_, Option<chrono::DateTime<chrono::Utc>>>(
        "SELECT last_used_at FROM api_tokens WHERE id = $1",
    )
    .bind(token.id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(last_used.is_some());
}

#[sqlx::test]
async fn test_list_tokens(pool: PgPool) {
    let repo = repo(&pool).await;
    common::create_test_user(&pool, common::OTHER_USER).await;

    repo.create_token(common::TEST_USER, "token1", "hash1")
        .await
        .unwrap();
    repo.create_token(common::TEST_USER, "token2", "hash2")
        .await
        .unwrap();
    repo.create_token(common::OTHER_USER, "token3", "hash3")
        .await
        .unwrap();

    let tokens = repo.list_tokens().await.unwrap();

    assert_eq!(tokens.len(), 3);
    assert_eq!(
        tokens
            .iter()
            .filter(|t| t.user_id == common::OTHER_USER)
            .count(),
        1
    );
}

#[sqlx::test]
async fn test_find_by_id_and_name(pool: PgPool) {
    let repo = repo(&pool).await;

    let created = repo
        .create_token(common::TEST_USER, "unique-name", "namehash")
        .await
        .unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "unique-name");

    let by_name = repo.find_by_name("unique-name").await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);

    assert!(repo.find_by_name("missing").await.unwrap().is_none());
    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
}
