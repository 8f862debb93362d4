//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgEntityRepository`] - Entity storage and retrieval
//! - [`PgPressReleaseRepository`] - Press release storage and identifier queries
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_entity_repository;
pub mod pg_press_release_repository;
pub mod pg_token_repository;

pub use pg_entity_repository::PgEntityRepository;
pub use pg_press_release_repository::PgPressReleaseRepository;
pub use pg_token_repository::PgTokenRepository;
