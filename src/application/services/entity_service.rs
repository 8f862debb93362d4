//! Entity (company/brand) management service.

use crate::domain::entities::{Entity, EntityProfile, NewEntity};
use crate::domain::repositories::EntityRepository;
use crate::error::AppError;
use crate::utils::id_generator::generate_id;
use serde_json::json;
use std::sync::Arc;

/// Service for managing the entities a user issues press releases for.
///
/// Every operation is scoped to the calling user: entities owned by someone
/// else are reported as not found.
pub struct EntityService<R: EntityRepository> {
    repository: Arc<R>,
}

impl<R: EntityRepository> EntityService<R> {
    /// Creates a new entity service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates an entity owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the company name is blank.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_entity(
        &self,
        user_id: &str,
        profile: EntityProfile,
    ) -> Result<Entity, AppError> {
        validate_profile(&profile)?;

        let entity = self
            .repository
            .create(NewEntity {
                id: generate_id(),
                user_id: user_id.to_string(),
                profile,
            })
            .await?;

        tracing::info!(entity_id = %entity.id, user_id, "Entity created");
        Ok(entity)
    }

    /// Fetches one of the user's entities.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entity does not exist or belongs
    /// to another user.
    pub async fn get_entity(&self, user_id: &str, id: &str) -> Result<Entity, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|entity| entity.is_owned_by(user_id))
            .ok_or_else(|| entity_not_found(id))
    }

    /// Lists the user's entities, most recent first.
    pub async fn list_entities(&self, user_id: &str) -> Result<Vec<Entity>, AppError> {
        self.repository.list_by_owner(user_id).await
    }

    /// Replaces the profile of one of the user's entities.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entity is not the user's.
    /// Returns [`AppError::Validation`] if the company name is blank.
    pub async fn update_entity(
        &self,
        user_id: &str,
        id: &str,
        profile: EntityProfile,
    ) -> Result<Entity, AppError> {
        validate_profile(&profile)?;
        self.get_entity(user_id, id).await?;

        self.repository.update(id, profile).await
    }

    /// Deletes one of the user's entities.
    ///
    /// Press releases that referenced it keep existing without an entity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the entity is not the user's.
    pub async fn delete_entity(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        self.get_entity(user_id, id).await?;

        if !self.repository.delete(id).await? {
            return Err(entity_not_found(id));
        }

        tracing::info!(entity_id = id, user_id, "Entity deleted");
        Ok(())
    }
}

fn validate_profile(profile: &EntityProfile) -> Result<(), AppError> {
    if profile.company_name.trim().is_empty() {
        return Err(AppError::bad_request(
            "Company name is required",
            json!({ "field": "company_name" }),
        ));
    }
    Ok(())
}

fn entity_not_found(id: &str) -> AppError {
    AppError::not_found("Entity not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockEntityRepository;
    use chrono::Utc;

    fn profile(name: &str) -> EntityProfile {
        EntityProfile {
            company_name: name.to_string(),
            ..Default::default()
        }
    }

    fn entity(id: &str, owner: &str) -> Entity {
        Entity::new(
            id.to_string(),
            owner.to_string(),
            profile("Acme"),
            Utc::now(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_entity_assigns_owner_and_id() {
        let mut mock_repo = MockEntityRepository::new();

        mock_repo
            .expect_create()
            .withf(|new| new.user_id == "user1" && new.id.len() == 12)
            .times(1)
            .returning(|new| {
                Ok(Entity::new(
                    new.id,
                    new.user_id,
                    new.profile,
                    Utc::now(),
                    Utc::now(),
                ))
            });

        let service = EntityService::new(Arc::new(mock_repo));

        let created = service.create_entity("user1", profile("Acme")).await.unwrap();

        assert_eq!(created.company_name(), "Acme");
        assert!(created.is_owned_by("user1"));
    }

    #[tokio::test]
    async fn test_create_entity_requires_company_name() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo.expect_create().times(0);

        let service = EntityService::new(Arc::new(mock_repo));

        let result = service.create_entity("user1", profile("   ")).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_entity_of_other_user_is_not_found() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(entity(id, "user2"))));

        let service = EntityService::new(Arc::new(mock_repo));

        let result = service.get_entity("user1", "ent1").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_checks_ownership_first() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(entity(id, "user2"))));
        mock_repo.expect_update().times(0);

        let service = EntityService::new(Arc::new(mock_repo));

        let result = service.update_entity("user1", "ent1", profile("New")).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_entity() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(entity(id, "user1"))));
        mock_repo
            .expect_delete()
            .withf(|id| id == "ent1")
            .times(1)
            .returning(|_| Ok(true));

        let service = EntityService::new(Arc::new(mock_repo));

        assert!(service.delete_entity("user1", "ent1").await.is_ok());
    }
}
