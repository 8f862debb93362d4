//! Repository trait for company/brand entities.

use crate::domain::entities::{Entity, EntityProfile, NewEntity};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing entities.
///
/// Lookups are not scoped by owner; ownership checks happen in
/// [`crate::application::services::EntityService`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEntityRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_entity.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Creates a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the owning user does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_entity: NewEntity) -> Result<Entity, AppError>;

    /// Finds an entity by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Entity>, AppError>;

    /// Fetches several entities at once; unknown ids are skipped.
    ///
    /// Used to join press releases with their entities before feed generation.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Entity>, AppError>;

    /// Lists a user's entities, most recent first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Entity>, AppError>;

    /// Replaces the profile of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entity matches `id`.
    async fn update(&self, id: &str, profile: EntityProfile) -> Result<Entity, AppError>;

    /// Deletes an entity, detaching its press releases.
    ///
    /// Returns `Ok(false)` if nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}
