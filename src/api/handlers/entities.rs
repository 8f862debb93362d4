//! Handlers for entity management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::entities::{EntityListResponse, EntityRequest};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::Entity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's entities, most recent first.
///
/// # Endpoint
///
/// `GET /api/entities`
pub async fn entity_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<EntityListResponse>, AppError> {
    let items = state.entity_service.list_entities(&user.user_id).await?;
    Ok(Json(EntityListResponse { items }))
}

/// Creates a new entity.
///
/// # Endpoint
///
/// `POST /api/entities`
///
/// # Errors
///
/// Returns 400 if the company name is missing or a URL/email field is malformed.
pub async fn create_entity_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<EntityRequest>,
) -> Result<(StatusCode, Json<Entity>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let entity = state
        .entity_service
        .create_entity(&user.user_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(entity)))
}

/// Returns one of the caller's entities.
///
/// # Endpoint
///
/// `GET /api/entities/{id}`
pub async fn get_entity_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Entity>, AppError> {
    let entity = state.entity_service.get_entity(&user.user_id, &id).await?;
    Ok(Json(entity))
}

/// Replaces the profile of one of the caller's entities.
///
/// # Endpoint
///
/// `PUT /api/entities/{id}`
///
/// The public feed embeds entity data, so its cache is dropped.
///
/// # Errors
///
/// Returns 404 if the entity is not the caller's.
/// Returns 400 if validation fails.
pub async fn update_entity_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<EntityRequest>,
) -> Result<Json<Entity>, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let entity = state
        .entity_service
        .update_entity(&user.user_id, &id, payload.into())
        .await?;

    state.feed_service.invalidate_public_feed().await;

    Ok(Json(entity))
}

/// Deletes one of the caller's entities.
///
/// # Endpoint
///
/// `DELETE /api/entities/{id}`
///
/// Releases that referenced the entity are kept and fall back to default
/// values in feeds.
pub async fn delete_entity_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.entity_service.delete_entity(&user.user_id, &id).await?;
    state.feed_service.invalidate_public_feed().await;

    Ok(StatusCode::NO_CONTENT)
}
