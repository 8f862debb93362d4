//! Repository trait for press releases.

use crate::domain::entities::{NewPressRelease, PressRelease};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing press releases.
///
/// # Identifier guarantees
///
/// - `pr_id` is unique at the storage level; a duplicate insert fails with
///   [`AppError::RetryAllocation`] so the caller can recompute and retry.
/// - [`Self::update`] never writes `pr_id`, and [`Self::assign_identifier`]
///   only fills an empty one: an assigned identifier never changes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPressReleaseRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_press_release.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PressReleaseRepository: Send + Sync {
    /// Inserts a new draft with an already allocated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RetryAllocation`] if `pr_id` is already taken.
    /// Returns [`AppError::Validation`] if the user or entity does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(
        &self,
        new_release: NewPressRelease,
        pr_id: Option<String>,
    ) -> Result<PressRelease, AppError>;

    /// Finds a press release by its internal id.
    async fn find_by_id(&self, id: &str) -> Result<Option<PressRelease>, AppError>;

    /// Lists a user's press releases, most recent first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PressRelease>, AppError>;

    /// Lists every published press release across all users, newest
    /// publication first.
    async fn list_published(&self) -> Result<Vec<PressRelease>, AppError>;

    /// Persists content, entity, status and timestamps of an existing release.
    ///
    /// `published_at` is only written when it is still empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no release matches `release.id`.
    async fn update(&self, release: &PressRelease) -> Result<PressRelease, AppError>;

    /// Deletes a press release. Returns `Ok(false)` if nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Returns the largest assigned identifier, compared numerically.
    ///
    /// Rows whose identifier is not in canonical form are returned as-is so
    /// the allocator can reject them.
    async fn max_identifier(&self) -> Result<Option<String>, AppError>;

    /// Returns every assigned identifier.
    async fn list_identifiers(&self) -> Result<Vec<String>, AppError>;

    /// Lists releases that have no identifier yet, oldest first.
    async fn list_without_identifier(&self) -> Result<Vec<PressRelease>, AppError>;

    /// Assigns `pr_id` to a release that has none.
    ///
    /// Returns `Ok(false)` when the release already had an identifier or does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RetryAllocation`] if `pr_id` is already taken.
    async fn assign_identifier(&self, id: &str, pr_id: &str) -> Result<bool, AppError>;
}
