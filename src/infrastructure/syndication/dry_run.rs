//! Submitter used when no aggregator endpoint is configured.

use super::{FeedSubmitter, SubmissionOutcome};
use async_trait::async_trait;
use tracing::info;

/// Logs the feed instead of sending it and always reports success.
pub struct DryRunSubmitter;

#[async_trait]
impl FeedSubmitter for DryRunSubmitter {
    async fn submit(&self, rss: &str, endpoint: Option<String>) -> SubmissionOutcome {
        info!(
            endpoint = endpoint.as_deref().unwrap_or("<none>"),
            bytes = rss.len(),
            "Dry-run RSS submission"
        );
        tracing::debug!(rss, "Dry-run RSS payload");

        SubmissionOutcome::succeeded("RSS feed submitted successfully (test mode)")
    }
}
