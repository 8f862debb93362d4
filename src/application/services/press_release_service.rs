//! Press release lifecycle service.
//!
//! Creation allocates the next `RW<n>` identifier with a compare-and-swap
//! loop: read the numeric maximum, compute its successor, insert under the
//! `UNIQUE (pr_id)` constraint, and start over when a concurrent writer won.

use chrono::Utc;
use metrics::counter;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{FixedInterval, jitter};

use crate::domain::entities::{
    NewPressRelease, PressRelease, PressReleaseWithEntity, ReleaseContent, ReleaseStatus,
};
use crate::domain::identifier::{PrId, max_identifier, next_identifier};
use crate::domain::repositories::{EntityRepository, PressReleaseRepository};
use crate::error::AppError;
use crate::utils::id_generator::generate_id;

/// Retries after the first allocation attempt loses a race.
pub const MAX_ALLOCATION_RETRIES: usize = 5;

/// Base pause between allocation attempts, jittered.
const ALLOCATION_RETRY_DELAY_MS: u64 = 20;

pub const HEADLINE_MAX_CHARS: usize = 70;
pub const SUBHEADLINE_MAX_CHARS: usize = 120;

/// Service for creating, editing and publishing press releases.
///
/// Every operation except [`Self::get_public_press_release`] is scoped to the
/// calling user: releases owned by someone else are reported as not found.
pub struct PressReleaseService<P: PressReleaseRepository, E: EntityRepository> {
    releases: Arc<P>,
    entities: Arc<E>,
}

impl<P: PressReleaseRepository, E: EntityRepository> PressReleaseService<P, E> {
    /// Creates a new press release service.
    pub fn new(releases: Arc<P>, entities: Arc<E>) -> Self {
        Self { releases, entities }
    }

    /// Creates a draft and assigns it the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the content is invalid.
    /// Returns [`AppError::NotFound`] if `entity_id` is not one of the user's entities.
    /// Returns [`AppError::DataIntegrity`] if the stored maximum identifier is malformed.
    /// Returns [`AppError::RetryAllocation`] if every allocation attempt lost a race.
    pub async fn create_press_release(
        &self,
        user_id: &str,
        entity_id: Option<String>,
        content: ReleaseContent,
    ) -> Result<PressRelease, AppError> {
        validate_content(&content)?;
        if let Some(entity_id) = &entity_id {
            self.ensure_entity_owned(user_id, entity_id).await?;
        }

        let new_release = NewPressRelease {
            id: generate_id(),
            user_id: user_id.to_string(),
            entity_id,
            content,
        };

        let strategy = FixedInterval::from_millis(ALLOCATION_RETRY_DELAY_MS)
            .map(jitter)
            .take(MAX_ALLOCATION_RETRIES);

        let created = RetryIf::start(
            strategy,
            || self.insert_with_next_identifier(new_release.clone()),
            |e: &AppError| {
                let lost_race = matches!(e, AppError::RetryAllocation { .. });
                if lost_race {
                    counter!("press_release_allocation_retries_total").increment(1);
                    tracing::warn!(release_id = %new_release.id, "Identifier taken concurrently, retrying");
                }
                lost_race
            },
        )
        .await?;

        tracing::info!(
            release_id = %created.id,
            pr_id = created.pr_id.as_deref().unwrap_or_default(),
            user_id,
            "Press release created"
        );
        Ok(created)
    }

    /// One compare-and-swap attempt: read the maximum, insert its successor.
    async fn insert_with_next_identifier(
        &self,
        new_release: NewPressRelease,
    ) -> Result<PressRelease, AppError> {
        let latest = self.releases.max_identifier().await?;
        let pr_id = next_identifier(latest.as_deref())?;

        self.releases.create(new_release, Some(pr_id)).await
    }

    /// Fetches one of the user's press releases.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the release does not exist or belongs
    /// to another user.
    pub async fn get_press_release(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<PressRelease, AppError> {
        self.releases
            .find_by_id(id)
            .await?
            .filter(|release| release.is_owned_by(user_id))
            .ok_or_else(|| release_not_found(id))
    }

    /// Lists the user's press releases, most recent first.
    pub async fn list_press_releases(&self, user_id: &str) -> Result<Vec<PressRelease>, AppError> {
        self.releases.list_by_owner(user_id).await
    }

    /// Replaces the content and entity of one of the user's releases.
    ///
    /// Status, identifier and publication date are left untouched.
    pub async fn update_press_release(
        &self,
        user_id: &str,
        id: &str,
        entity_id: Option<String>,
        content: ReleaseContent,
    ) -> Result<PressRelease, AppError> {
        validate_content(&content)?;
        let mut release = self.get_press_release(user_id, id).await?;
        if let Some(entity_id) = &entity_id {
            self.ensure_entity_owned(user_id, entity_id).await?;
        }

        release.entity_id = entity_id;
        release.content = content;
        release.updated_at = Utc::now();

        self.releases.update(&release).await
    }

    /// Publishes a release; the first publication stamps `published_at`.
    pub async fn publish_press_release(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<PressRelease, AppError> {
        self.transition(user_id, id, ReleaseStatus::Published).await
    }

    /// Moves a release to the reporting stage.
    pub async fn report_press_release(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<PressRelease, AppError> {
        self.transition(user_id, id, ReleaseStatus::Reporting).await
    }

    async fn transition(
        &self,
        user_id: &str,
        id: &str,
        to: ReleaseStatus,
    ) -> Result<PressRelease, AppError> {
        let mut release = self.get_press_release(user_id, id).await?;
        let from = release.status;

        release.transition_to(to, Utc::now())?;
        if from == to {
            return Ok(release);
        }

        let updated = self.releases.update(&release).await?;
        tracing::info!(release_id = id, %from, %to, "Press release status changed");
        Ok(updated)
    }

    /// Deletes one of the user's press releases.
    pub async fn delete_press_release(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        self.get_press_release(user_id, id).await?;

        if !self.releases.delete(id).await? {
            return Err(release_not_found(id));
        }

        tracing::info!(release_id = id, user_id, "Press release deleted");
        Ok(())
    }

    /// Fetches a release for its public page, joined with its entity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] unless the release is published or reporting.
    pub async fn get_public_press_release(
        &self,
        id: &str,
    ) -> Result<PressReleaseWithEntity, AppError> {
        let release = self
            .releases
            .find_by_id(id)
            .await?
            .filter(PressRelease::is_publicly_visible)
            .ok_or_else(|| release_not_found(id))?;

        let entity = match &release.entity_id {
            Some(entity_id) => self.entities.find_by_id(entity_id).await?,
            None => None,
        };

        Ok(PressReleaseWithEntity::new(release, entity))
    }

    /// Assigns identifiers to releases stored without one, oldest first.
    ///
    /// Numbering continues from the numeric maximum of every stored
    /// identifier. A number taken concurrently by a new release is skipped;
    /// a release that got an identifier in the meantime is left alone.
    ///
    /// Returns the `(id, pr_id)` pairs that were assigned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DataIntegrity`] if any stored identifier is malformed.
    pub async fn backfill_identifiers(&self) -> Result<Vec<(String, String)>, AppError> {
        let pending = self.releases.list_without_identifier().await?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self.releases.list_identifiers().await?;
        let mut next = match max_identifier(stored.iter().map(String::as_str))? {
            Some(max) => max.successor()?,
            None => PrId::FIRST,
        };

        let mut assigned = Vec::with_capacity(pending.len());
        for release in pending {
            let mut collisions = 0;
            loop {
                let pr_id = next.to_string();
                match self.releases.assign_identifier(&release.id, &pr_id).await {
                    Ok(true) => {
                        tracing::info!(release_id = %release.id, pr_id, "Identifier backfilled");
                        assigned.push((release.id.clone(), pr_id));
                        next = next.successor()?;
                        break;
                    }
                    Ok(false) => break,
                    Err(AppError::RetryAllocation { .. }) if collisions < MAX_ALLOCATION_RETRIES => {
                        collisions += 1;
                        next = next.successor()?;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(assigned)
    }

    async fn ensure_entity_owned(&self, user_id: &str, entity_id: &str) -> Result<(), AppError> {
        match self.entities.find_by_id(entity_id).await? {
            Some(entity) if entity.is_owned_by(user_id) => Ok(()),
            _ => Err(AppError::not_found(
                "Entity not found",
                json!({ "id": entity_id }),
            )),
        }
    }
}

/// Attaches each release's entity using one batched lookup.
///
/// Releases whose entity is missing are kept with `entity: None`.
pub async fn join_entities<E: EntityRepository + ?Sized>(
    entities: &E,
    releases: Vec<PressRelease>,
) -> Result<Vec<PressReleaseWithEntity>, AppError> {
    let ids: Vec<String> = releases
        .iter()
        .filter_map(|r| r.entity_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let by_id: HashMap<String, _> = entities
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|entity| (entity.id.clone(), entity))
        .collect();

    Ok(releases
        .into_iter()
        .map(|release| {
            let entity = release
                .entity_id
                .as_ref()
                .and_then(|id| by_id.get(id).cloned());
            PressReleaseWithEntity::new(release, entity)
        })
        .collect())
}

fn validate_content(content: &ReleaseContent) -> Result<(), AppError> {
    let headline_len = content.headline.trim().chars().count();
    if headline_len == 0 || content.headline.chars().count() > HEADLINE_MAX_CHARS {
        return Err(AppError::bad_request(
            format!("Headline must be 1-{HEADLINE_MAX_CHARS} characters"),
            json!({ "field": "headline" }),
        ));
    }

    let subheadline_len = content
        .subheadline
        .as_deref()
        .map_or(0, |s| s.chars().count());
    if subheadline_len > SUBHEADLINE_MAX_CHARS {
        return Err(AppError::bad_request(
            format!("Subheadline must be at most {SUBHEADLINE_MAX_CHARS} characters"),
            json!({ "field": "subheadline" }),
        ));
    }

    Ok(())
}

fn release_not_found(id: &str) -> AppError {
    AppError::not_found("Press release not found", json!({ "id": id }))
}
