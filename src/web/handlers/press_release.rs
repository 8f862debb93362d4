//! Public press release page, the target of every RSS item link.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};

use crate::domain::entities::PressReleaseWithEntity;
use crate::domain::feed::item::{assemble_content, content_blocks, description};
use crate::error::AppError;
use crate::state::AppState;

/// Template for a single press release.
///
/// `content_html` is the same HTML that goes into the feed's
/// `content:encoded` and is rendered unescaped.
#[derive(Template, WebTemplate)]
#[template(path = "press_release.html")]
pub struct PressReleaseTemplate {
    pub headline: String,
    pub subheadline: Option<String>,
    pub pr_id: Option<String>,
    pub company: Option<String>,
    pub published: Option<String>,
    pub summary: String,
    pub content_html: Option<String>,
    pub author: Option<String>,
}

impl PressReleaseTemplate {
    pub fn from_release(joined: &PressReleaseWithEntity) -> Self {
        let release = &joined.release;
        let company = joined.entity.as_ref().map(|e| e.company_name());
        let content = &release.content;

        Self {
            headline: content.headline.clone(),
            subheadline: content.subheadline.clone(),
            pr_id: release.pr_id.clone(),
            company: company.map(str::to_string),
            published: release
                .published_at
                .map(|d| d.format("%B %-d, %Y").to_string()),
            summary: description(release),
            content_html: assemble_content(&content_blocks(release, company)),
            author: content.author_name.clone(),
        }
    }
}

/// Renders a published press release.
///
/// # Endpoint
///
/// `GET /press-releases/{id}/view`
///
/// # Errors
///
/// Returns 404 for unknown ids and for drafts.
pub async fn press_release_view_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<PressReleaseTemplate, AppError> {
    let joined = state
        .press_release_service
        .get_public_press_release(&id)
        .await?;

    Ok(PressReleaseTemplate::from_release(&joined))
}
