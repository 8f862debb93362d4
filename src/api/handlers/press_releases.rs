//! Handlers for press release endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::press_releases::{
    ListPressReleasesParams, PressReleaseListResponse, PressReleaseRequest,
};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::PressRelease;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's press releases, most recent first.
///
/// # Endpoint
///
/// `GET /api/press-releases?status=published`
///
/// `status` is optional and must be one of `draft`, `published`, `reporting`.
pub async fn press_release_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ListPressReleasesParams>,
) -> Result<Json<PressReleaseListResponse>, AppError> {
    let items = state
        .press_release_service
        .list_press_releases(&user.user_id)
        .await?
        .into_iter()
        .filter(|release| params.status.is_none_or(|status| release.status == status))
        .collect();

    Ok(Json(PressReleaseListResponse { items }))
}

/// Creates a draft press release and assigns its `pr_id`.
///
/// # Endpoint
///
/// `POST /api/press-releases`
///
/// # Request Body
///
/// ```json
/// {
///   "entity_id": "k3J9xQ2mLpZa",   // optional
///   "headline": "Acme Launches Widget",
///   "lead_paragraph": "Acme today announced...",
///   "body_content": "<p>Full story</p>"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 if `entity_id` is not one of the caller's entities.
/// Returns 409 `retry_allocation` if identifier allocation kept losing races.
/// Returns 500 `data_integrity_error` if a stored identifier is malformed.
pub async fn create_press_release_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PressReleaseRequest>,
) -> Result<(StatusCode, Json<PressRelease>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;
    let (entity_id, content) = payload.into_parts();

    let release = state
        .press_release_service
        .create_press_release(&user.user_id, entity_id, content)
        .await?;

    Ok((StatusCode::CREATED, Json(release)))
}

/// Returns one of the caller's press releases.
///
/// # Endpoint
///
/// `GET /api/press-releases/{id}`
pub async fn get_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PressRelease>, AppError> {
    let release = state
        .press_release_service
        .get_press_release(&user.user_id, &id)
        .await?;

    Ok(Json(release))
}

/// Replaces the content of one of the caller's press releases.
///
/// # Endpoint
///
/// `PUT /api/press-releases/{id}`
///
/// Status, `pr_id` and `published_at` are not affected.
pub async fn update_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PressReleaseRequest>,
) -> Result<Json<PressRelease>, AppError> {
    let payload = payload.normalized();
    payload.validate()?;
    let (entity_id, content) = payload.into_parts();

    let release = state
        .press_release_service
        .update_press_release(&user.user_id, &id, entity_id, content)
        .await?;

    state.feed_service.invalidate_public_feed().await;

    Ok(Json(release))
}

/// Publishes one of the caller's press releases.
///
/// # Endpoint
///
/// `POST /api/press-releases/{id}/publish`
///
/// # Errors
///
/// Returns 400 if the release cannot move to `published` from its current status.
pub async fn publish_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PressRelease>, AppError> {
    let release = state
        .press_release_service
        .publish_press_release(&user.user_id, &id)
        .await?;

    state.feed_service.invalidate_public_feed().await;

    Ok(Json(release))
}

/// Moves one of the caller's press releases to `reporting`.
///
/// # Endpoint
///
/// `POST /api/press-releases/{id}/report`
pub async fn report_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PressRelease>, AppError> {
    let release = state
        .press_release_service
        .report_press_release(&user.user_id, &id)
        .await?;

    state.feed_service.invalidate_public_feed().await;

    Ok(Json(release))
}

/// Deletes one of the caller's press releases.
///
/// # Endpoint
///
/// `DELETE /api/press-releases/{id}`
pub async fn delete_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state
        .press_release_service
        .delete_press_release(&user.user_id, &id)
        .await?;

    state.feed_service.invalidate_public_feed().await;

    Ok(StatusCode::NO_CONTENT)
}
