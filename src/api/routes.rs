//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_entity_handler, create_press_release_handler, delete_entity_handler,
    delete_press_release_handler, entity_list_handler, get_entity_handler,
    get_press_release_handler, press_release_list_handler, publish_press_release_handler,
    report_press_release_handler, submit_press_release_handler, update_entity_handler,
    update_press_release_handler, user_feed_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /entities`                     - List own entities
/// - `POST   /entities`                     - Create an entity
/// - `GET    /entities/{id}`                - Read an entity
/// - `PUT    /entities/{id}`                - Replace an entity profile
/// - `DELETE /entities/{id}`                - Delete an entity (releases are detached)
/// - `GET    /press-releases`               - List own press releases
/// - `POST   /press-releases`               - Create a draft and allocate its `pr_id`
/// - `GET    /press-releases/{id}`          - Read a press release
/// - `PUT    /press-releases/{id}`          - Replace press release content
/// - `DELETE /press-releases/{id}`          - Delete a press release
/// - `POST   /press-releases/{id}/publish`  - Publish
/// - `POST   /press-releases/{id}/report`   - Move to reporting
/// - `POST   /press-releases/{id}/submit`   - Submit a single-release feed to the aggregator
/// - `GET    /feed`                         - Own feed, optionally for one release
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entities",
            get(entity_list_handler).post(create_entity_handler),
        )
        .route(
            "/entities/{id}",
            get(get_entity_handler)
                .put(update_entity_handler)
                .delete(delete_entity_handler),
        )
        .route(
            "/press-releases",
            get(press_release_list_handler).post(create_press_release_handler),
        )
        .route(
            "/press-releases/{id}",
            get(get_press_release_handler)
                .put(update_press_release_handler)
                .delete(delete_press_release_handler),
        )
        .route(
            "/press-releases/{id}/publish",
            post(publish_press_release_handler),
        )
        .route(
            "/press-releases/{id}/report",
            post(report_press_release_handler),
        )
        .route(
            "/press-releases/{id}/submit",
            post(submit_press_release_handler),
        )
        .route("/feed", get(user_feed_handler))
}
