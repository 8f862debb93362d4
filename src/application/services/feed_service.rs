//! RSS feed service: public feed, per-user preview and aggregator submission.

use metrics::counter;
use serde_json::json;
use std::sync::Arc;

use crate::application::services::press_release_service::join_entities;
use crate::domain::entities::PressReleaseWithEntity;
use crate::domain::feed::generate_feed;
use crate::domain::repositories::{EntityRepository, PressReleaseRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, PUBLIC_FEED_KEY};
use crate::infrastructure::syndication::{FeedSubmitter, SubmissionOutcome};

/// Builds feeds from stored releases and hands them to callers or the aggregator.
pub struct FeedService<P: PressReleaseRepository, E: EntityRepository> {
    releases: Arc<P>,
    entities: Arc<E>,
    cache: Arc<dyn CacheService>,
    submitter: Arc<dyn FeedSubmitter>,
    base_url: String,
    cache_ttl_seconds: u64,
}

impl<P: PressReleaseRepository, E: EntityRepository> FeedService<P, E> {
    /// Creates a new feed service.
    ///
    /// `base_url` is the public origin item links point at.
    pub fn new(
        releases: Arc<P>,
        entities: Arc<E>,
        cache: Arc<dyn CacheService>,
        submitter: Arc<dyn FeedSubmitter>,
        base_url: String,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            releases,
            entities,
            cache,
            submitter,
            base_url,
            cache_ttl_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Feed of every published release across all users.
    ///
    /// Served from cache when possible; a cache failure only costs a
    /// regeneration.
    pub async fn public_feed(&self) -> Result<String, AppError> {
        match self.cache.get(PUBLIC_FEED_KEY).await {
            Ok(Some(xml)) => return Ok(xml),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Public feed cache read failed"),
        }

        let published = self.releases.list_published().await?;
        let xml = self.render(join_entities(self.entities.as_ref(), published).await?, "public");

        if let Err(e) = self
            .cache
            .set(PUBLIC_FEED_KEY, &xml, Some(self.cache_ttl_seconds))
            .await
        {
            tracing::warn!(error = %e, "Public feed cache write failed");
        }

        Ok(xml)
    }

    /// Feed of the user's releases, or of a single one of them.
    ///
    /// Drafts are accepted as input but, like everywhere else, only
    /// published releases become items.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `press_release_id` is not one of the
    /// user's releases.
    pub async fn user_feed(
        &self,
        user_id: &str,
        press_release_id: Option<&str>,
    ) -> Result<String, AppError> {
        let releases = match press_release_id {
            Some(id) => vec![
                self.releases
                    .find_by_id(id)
                    .await?
                    .filter(|r| r.is_owned_by(user_id))
                    .ok_or_else(|| {
                        AppError::not_found("Press release not found", json!({ "id": id }))
                    })?,
            ],
            None => self.releases.list_by_owner(user_id).await?,
        };

        Ok(self.render(join_entities(self.entities.as_ref(), releases).await?, "user"))
    }

    /// Generates a single-release feed and submits it to the aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the release is not the user's and
    /// [`AppError::Validation`] if it is not published. Submission failures
    /// are not errors: they come back as an unsuccessful [`SubmissionOutcome`].
    pub async fn submit_press_release(
        &self,
        user_id: &str,
        id: &str,
        endpoint: Option<String>,
    ) -> Result<SubmissionOutcome, AppError> {
        let release = self
            .releases
            .find_by_id(id)
            .await?
            .filter(|r| r.is_owned_by(user_id))
            .ok_or_else(|| AppError::not_found("Press release not found", json!({ "id": id })))?;

        if !release.is_published() {
            return Err(AppError::bad_request(
                "Only published press releases can be submitted",
                json!({ "id": id, "status": release.status.as_str() }),
            ));
        }

        let joined = join_entities(self.entities.as_ref(), vec![release]).await?;
        let xml = self.render(joined, "submission");

        let outcome = self.submitter.submit(&xml, endpoint).await;
        let result = if outcome.success { "success" } else { "failure" };
        counter!("feed_submissions_total", "result" => result).increment(1);
        tracing::info!(release_id = id, success = outcome.success, message = %outcome.message, "Feed submitted");

        Ok(outcome)
    }

    /// Drops the cached public feed after a change to releases or entities.
    pub async fn invalidate_public_feed(&self) {
        if let Err(e) = self.cache.invalidate(PUBLIC_FEED_KEY).await {
            tracing::warn!(error = %e, "Failed to invalidate public feed cache");
        }
    }

    fn render(&self, releases: Vec<PressReleaseWithEntity>, kind: &'static str) -> String {
        counter!("feeds_generated_total", "kind" => kind).increment(1);
        generate_feed(&releases, &self.base_url)
    }
}
