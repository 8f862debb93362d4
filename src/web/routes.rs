//! Public page route configuration.

use crate::state::AppState;
use crate::web::handlers::press_release_view_handler;
use axum::{Router, routing::get};

/// Public pages, no authentication.
///
/// # Endpoints
///
/// - `GET /press-releases/{id}/view` - Published press release page
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/press-releases/{id}/view", get(press_release_view_handler))
}
