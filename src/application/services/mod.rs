//! Business logic services for the application layer.

pub mod auth_service;
pub mod entity_service;
pub mod feed_service;
pub mod press_release_service;

pub use auth_service::AuthService;
pub use entity_service::EntityService;
pub use feed_service::FeedService;
pub use press_release_service::PressReleaseService;
