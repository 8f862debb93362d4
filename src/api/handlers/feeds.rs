//! Handlers serving RSS feeds and submitting them to the aggregator.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::feeds::{FeedQuery, SubmitRequest};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::feed::RSS_CONTENT_TYPE;
use crate::error::AppError;
use crate::infrastructure::syndication::SubmissionOutcome;
use crate::state::AppState;

fn rss_response(xml: String) -> Response {
    ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response()
}

/// Public feed of every published press release.
///
/// # Endpoint
///
/// `GET /feed.xml`
///
/// Served from cache when available; the cache is dropped on every press
/// release or entity change.
pub async fn public_feed_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let xml = state.feed_service.public_feed().await?;
    Ok(rss_response(xml))
}

/// Feed of the caller's published releases, for preview or download.
///
/// # Endpoint
///
/// `GET /api/feed?press_release_id={id}`
///
/// Without `press_release_id` the feed covers all of the caller's releases.
///
/// # Errors
///
/// Returns 404 if `press_release_id` is not one of the caller's releases.
pub async fn user_feed_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, AppError> {
    let xml = state
        .feed_service
        .user_feed(&user.user_id, query.press_release_id())
        .await?;

    Ok(rss_response(xml))
}

/// Generates a single-release feed and submits it to the aggregator.
///
/// # Endpoint
///
/// `POST /api/press-releases/{id}/submit`
///
/// # Request Body
///
/// Optional. An `endpoint` overrides the configured aggregator URL:
///
/// ```json
/// { "endpoint": "https://aggregator.example.com/ingest" }
/// ```
///
/// # Response
///
/// Always `200 OK` once the release is found and published; the outcome of
/// the submission itself is reported in the body:
///
/// ```json
/// { "success": false, "message": "Aggregator responded with 502 Bad Gateway" }
/// ```
///
/// # Errors
///
/// Returns 404 if the release is not the caller's.
/// Returns 400 if it is not published or the body is invalid.
pub async fn submit_press_release_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<Json<SubmissionOutcome>, AppError> {
    let request = parse_submit_request(&body)?;

    let outcome = state
        .feed_service
        .submit_press_release(&user.user_id, &id, request.endpoint)
        .await?;

    Ok(Json(outcome))
}

fn parse_submit_request(body: &[u8]) -> Result<SubmitRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubmitRequest::default());
    }

    let request: SubmitRequest = serde_json::from_slice(body).map_err(|e| {
        AppError::bad_request("Invalid request body", json!({ "reason": e.to_string() }))
    })?;
    let request = request.normalized();
    request.validate()?;

    Ok(request)
}
