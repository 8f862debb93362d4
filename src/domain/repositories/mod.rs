//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`EntityRepository`] - Company/brand CRUD operations
//! - [`PressReleaseRepository`] - Press release storage and identifier queries
//! - [`TokenRepository`] - API token authentication
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod entity_repository;
pub mod press_release_repository;
pub mod token_repository;

pub use entity_repository::EntityRepository;
pub use press_release_repository::PressReleaseRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use entity_repository::MockEntityRepository;
#[cfg(test)]
pub use press_release_repository::MockPressReleaseRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
