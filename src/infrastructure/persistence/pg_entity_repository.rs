//! PostgreSQL implementation of entity repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Entity, EntityProfile, NewEntity};
use crate::domain::repositories::EntityRepository;
use crate::error::AppError;

const ENTITY_COLUMNS: &str = r#"
    id, user_id, company_name, company_address, google_business_profile_url,
    website_url, industry, pr_contact_first_name, pr_contact_last_name, pr_email,
    facebook_url, twitter_url, reddit_url, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct EntityRow {
    id: String,
    user_id: String,
    company_name: String,
    company_address: Option<String>,
    google_business_profile_url: Option<String>,
    website_url: Option<String>,
    industry: Option<String>,
    pr_contact_first_name: Option<String>,
    pr_contact_last_name: Option<String>,
    pr_email: Option<String>,
    facebook_url: Option<String>,
    twitter_url: Option<String>,
    reddit_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntityRow> for Entity {
    fn from(r: EntityRow) -> Self {
        Entity::new(
            r.id,
            r.user_id,
            EntityProfile {
                company_name: r.company_name,
                company_address: r.company_address,
                google_business_profile_url: r.google_business_profile_url,
                website_url: r.website_url,
                industry: r.industry,
                pr_contact_first_name: r.pr_contact_first_name,
                pr_contact_last_name: r.pr_contact_last_name,
                pr_email: r.pr_email,
                facebook_url: r.facebook_url,
                twitter_url: r.twitter_url,
                reddit_url: r.reddit_url,
            },
            r.created_at,
            r.updated_at,
        )
    }
}

/// PostgreSQL repository for entity storage and retrieval.
pub struct PgEntityRepository {
    pool: Arc<PgPool>,
}

impl PgEntityRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository for PgEntityRepository {
    async fn create(&self, new_entity: NewEntity) -> Result<Entity, AppError> {
        let p = new_entity.profile;
        let sql = format!(
            r#"
            INSERT INTO entities (
                id, user_id, company_name, company_address, google_business_profile_url,
                website_url, industry, pr_contact_first_name, pr_contact_last_name, pr_email,
                facebook_url, twitter_url, reddit_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ENTITY_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(new_entity.id)
            .bind(new_entity.user_id)
            .bind(p.company_name)
            .bind(p.company_address)
            .bind(p.google_business_profile_url)
            .bind(p.website_url)
            .bind(p.industry)
            .bind(p.pr_contact_first_name)
            .bind(p.pr_contact_last_name)
            .bind(p.pr_email)
            .bind(p.facebook_url)
            .bind(p.twitter_url)
            .bind(p.reddit_url)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Entity>, AppError> {
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = $1");

        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Entity::from))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Entity>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ANY($1)");

        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Entity>, AppError> {
        let sql = format!(
            "SELECT {ENTITY_COLUMNS} FROM entities WHERE user_id = $1 ORDER BY created_at DESC, id"
        );

        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn update(&self, id: &str, profile: EntityProfile) -> Result<Entity, AppError> {
        let sql = format!(
            r#"
            UPDATE entities
            SET company_name = $2,
                company_address = $3,
                google_business_profile_url = $4,
                website_url = $5,
                industry = $6,
                pr_contact_first_name = $7,
                pr_contact_last_name = $8,
                pr_email = $9,
                facebook_url = $10,
                twitter_url = $11,
                reddit_url = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ENTITY_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(id)
            .bind(profile.company_name)
            .bind(profile.company_address)
            .bind(profile.google_business_profile_url)
            .bind(profile.website_url)
            .bind(profile.industry)
            .bind(profile.pr_contact_first_name)
            .bind(profile.pr_contact_last_name)
            .bind(profile.pr_email)
            .bind(profile.facebook_url)
            .bind(profile.twitter_url)
            .bind(profile.reddit_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Entity::from)
            .ok_or_else(|| AppError::not_found("Entity not found", json!({ "id": id })))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
