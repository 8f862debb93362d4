//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod entities;
pub mod feeds;
pub mod health;
pub mod press_releases;

pub use entities::{
    create_entity_handler, delete_entity_handler, entity_list_handler, get_entity_handler,
    update_entity_handler,
};
pub use feeds::{public_feed_handler, submit_press_release_handler, user_feed_handler};
pub use health::health_handler;
pub use press_releases::{
    create_press_release_handler, delete_press_release_handler, get_press_release_handler,
    press_release_list_handler, publish_press_release_handler, report_press_release_handler,
    update_press_release_handler,
};
