//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::entity_service::EntityService`] - Entity management
//! - [`services::press_release_service::PressReleaseService`] - Press release lifecycle and identifier allocation
//! - [`services::feed_service::FeedService`] - RSS feeds and aggregator submission
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
