//! PostgreSQL implementation of press release repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;

use crate::domain::entities::{NewPressRelease, PressRelease, ReleaseContent, ReleaseStatus};
use crate::domain::repositories::PressReleaseRepository;
use crate::error::AppError;

const RELEASE_COLUMNS: &str = r#"
    id, user_id, entity_id, pr_id, status,
    headline, subheadline, dateline_city, dateline_state, dateline_date,
    lead_paragraph, body_content, boilerplate, call_to_action,
    media_contact_name, media_contact_title, media_contact_email,
    media_contact_phone, media_contact_website,
    author_name, author_title, author_company, author_email, author_social_handle,
    meta_title, meta_description, keywords,
    created_at, updated_at, published_at
"#;

#[derive(sqlx::FromRow)]
struct PressReleaseRow {
    id: String,
    user_id: String,
    entity_id: Option<String>,
    pr_id: Option<String>,
    status: String,
    headline: String,
    subheadline: Option<String>,
    dateline_city: Option<String>,
    dateline_state: Option<String>,
    dateline_date: Option<DateTime<Utc>>,
    lead_paragraph: Option<String>,
    body_content: Option<String>,
    boilerplate: Option<String>,
    call_to_action: Option<String>,
    media_contact_name: Option<String>,
    media_contact_title: Option<String>,
    media_contact_email: Option<String>,
    media_contact_phone: Option<String>,
    media_contact_website: Option<String>,
    author_name: Option<String>,
    author_title: Option<String>,
    author_company: Option<String>,
    author_email: Option<String>,
    author_social_handle: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    keywords: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl TryFrom<PressReleaseRow> for PressRelease {
    type Error = AppError;

    fn try_from(r: PressReleaseRow) -> Result<Self, Self::Error> {
        let status: ReleaseStatus = r.status.parse().map_err(|e| {
            AppError::data_integrity(
                format!("Press release {} has an invalid status", r.id),
                json!({ "reason": format!("{e}") }),
            )
        })?;

        Ok(PressRelease {
            id: r.id,
            user_id: r.user_id,
            entity_id: r.entity_id,
            pr_id: r.pr_id,
            status,
            content: ReleaseContent {
                headline: r.headline,
                subheadline: r.subheadline,
                dateline_city: r.dateline_city,
                dateline_state: r.dateline_state,
                dateline_date: r.dateline_date,
                lead_paragraph: r.lead_paragraph,
                body_content: r.body_content,
                boilerplate: r.boilerplate,
                call_to_action: r.call_to_action,
                media_contact_name: r.media_contact_name,
                media_contact_title: r.media_contact_title,
                media_contact_email: r.media_contact_email,
                media_contact_phone: r.media_contact_phone,
                media_contact_website: r.media_contact_website,
                author_name: r.author_name,
                author_title: r.author_title,
                author_company: r.author_company,
                author_email: r.author_email,
                author_social_handle: r.author_social_handle,
                meta_title: r.meta_title,
                meta_description: r.meta_description,
                keywords: r.keywords,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
            published_at: r.published_at,
        })
    }
}

fn into_releases(rows: Vec<PressReleaseRow>) -> Result<Vec<PressRelease>, AppError> {
    rows.into_iter().map(PressRelease::try_from).collect()
}

/// Binds the 22 content columns, in declaration order.
fn bind_content<'q>(
    query: QueryAs<'q, Postgres, PressReleaseRow, PgArguments>,
    c: ReleaseContent,
) -> QueryAs<'q, Postgres, PressReleaseRow, PgArguments> {
    query
        .bind(c.headline)
        .bind(c.subheadline)
        .bind(c.dateline_city)
        .bind(c.dateline_state)
        .bind(c.dateline_date)
        .bind(c.lead_paragraph)
        .bind(c.body_content)
        .bind(c.boilerplate)
        .bind(c.call_to_action)
        .bind(c.media_contact_name)
        .bind(c.media_contact_title)
        .bind(c.media_contact_email)
        .bind(c.media_contact_phone)
        .bind(c.media_contact_website)
        .bind(c.author_name)
        .bind(c.author_title)
        .bind(c.author_company)
        .bind(c.author_email)
        .bind(c.author_social_handle)
        .bind(c.meta_title)
        .bind(c.meta_description)
        .bind(c.keywords)
}

/// PostgreSQL repository for press releases.
///
/// Identifier uniqueness is enforced by the `press_releases_pr_id_key`
/// constraint; violations surface as [`AppError::RetryAllocation`].
pub struct PgPressReleaseRepository {
    pool: Arc<PgPool>,
}

impl PgPressReleaseRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PressReleaseRepository for PgPressReleaseRepository {
    async fn create(
        &self,
        new_release: NewPressRelease,
        pr_id: Option<String>,
    ) -> Result<PressRelease, AppError> {
        let sql = format!(
            r#"
            INSERT INTO press_releases (
                id, user_id, entity_id, pr_id,
                headline, subheadline, dateline_city, dateline_state, dateline_date,
                lead_paragraph, body_content, boilerplate, call_to_action,
                media_contact_name, media_contact_title, media_contact_email,
                media_contact_phone, media_contact_website,
                author_name, author_title, author_company, author_email, author_social_handle,
                meta_title, meta_description, keywords
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26
            )
            RETURNING {RELEASE_COLUMNS}
            "#
        );

        let query = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .bind(new_release.id)
            .bind(new_release.user_id)
            .bind(new_release.entity_id)
            .bind(pr_id);

        let row = bind_content(query, new_release.content)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PressRelease>, AppError> {
        let sql = format!("SELECT {RELEASE_COLUMNS} FROM press_releases WHERE id = $1");

        let row = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(PressRelease::try_from).transpose()
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PressRelease>, AppError> {
        let sql = format!(
            "SELECT {RELEASE_COLUMNS} FROM press_releases WHERE user_id = $1 ORDER BY created_at DESC, id"
        );

        let rows = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_releases(rows)
    }

    async fn list_published(&self) -> Result<Vec<PressRelease>, AppError> {
        let sql = format!(
            r#"
            SELECT {RELEASE_COLUMNS}
            FROM press_releases
            WHERE status = 'published'
            ORDER BY COALESCE(published_at, created_at) DESC, id
            "#
        );

        let rows = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_releases(rows)
    }

    async fn update(&self, release: &PressRelease) -> Result<PressRelease, AppError> {
        let sql = format!(
            r#"
            UPDATE press_releases
            SET entity_id = $2,
                status = $3,
                published_at = COALESCE(published_at, $4),
                updated_at = $5,
                headline = $6,
                subheadline = $7,
                dateline_city = $8,
                dateline_state = $9,
                dateline_date = $10,
                lead_paragraph = $11,
                body_content = $12,
                boilerplate = $13,
                call_to_action = $14,
                media_contact_name = $15,
                media_contact_title = $16,
                media_contact_email = $17,
                media_contact_phone = $18,
                media_contact_website = $19,
                author_name = $20,
                author_title = $21,
                author_company = $22,
                author_email = $23,
                author_social_handle = $24,
                meta_title = $25,
                meta_description = $26,
                keywords = $27
            WHERE id = $1
            RETURNING {RELEASE_COLUMNS}
            "#
        );

        let query = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .bind(release.id.clone())
            .bind(release.entity_id.clone())
            .bind(release.status.as_str())
            .bind(release.published_at)
            .bind(release.updated_at);

        let row = bind_content(query, release.content.clone())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.ok_or_else(|| AppError::not_found("Press release not found", json!({ "id": release.id })))?
            .try_into()
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM press_releases WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn max_identifier(&self) -> Result<Option<String>, AppError> {
        // Canonical identifiers have no leading zeros, so a longer one is
        // always numerically larger.
        let max = sqlx::query_scalar::<_, String>(
            r#"
            SELECT pr_id
            FROM press_releases
            WHERE pr_id IS NOT NULL
            ORDER BY LENGTH(pr_id) DESC, pr_id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(max)
    }

    async fn list_identifiers(&self) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT pr_id FROM press_releases WHERE pr_id IS NOT NULL",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn list_without_identifier(&self) -> Result<Vec<PressRelease>, AppError> {
        let sql = format!(
            "SELECT {RELEASE_COLUMNS} FROM press_releases WHERE pr_id IS NULL ORDER BY created_at ASC, id"
        );

        let rows = sqlx::query_as::<_, PressReleaseRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        into_releases(rows)
    }

    async fn assign_identifier(&self, id: &str, pr_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE press_releases
            SET pr_id = $2
            WHERE id = $1 AND pr_id IS NULL
            "#,
        )
        .bind(id)
        .bind(pr_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
