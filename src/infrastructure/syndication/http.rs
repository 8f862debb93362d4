//! HTTP submission via `reqwest`.

use super::{FeedSubmitter, SubmissionOutcome};
use crate::domain::feed::RSS_CONTENT_TYPE;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Submits feeds with a single POST per call.
pub struct HttpFeedSubmitter {
    client: reqwest::Client,
    default_endpoint: String,
}

impl HttpFeedSubmitter {
    /// Builds a submitter whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(default_endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rankwire/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            default_endpoint,
        })
    }
}

#[async_trait]
impl FeedSubmitter for HttpFeedSubmitter {
    async fn submit(&self, rss: &str, endpoint: Option<String>) -> SubmissionOutcome {
        let endpoint = endpoint.as_deref().unwrap_or(&self.default_endpoint);

        let url = match Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                return SubmissionOutcome::failed(format!(
                    "Invalid submission endpoint: {endpoint}"
                ));
            }
        };

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, RSS_CONTENT_TYPE)
            .body(rss.to_owned())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!(endpoint, status = %resp.status(), "RSS feed submitted");
                SubmissionOutcome::succeeded("RSS feed submitted successfully")
            }
            Ok(resp) => {
                let status = resp.status();
                warn!(endpoint, %status, "Aggregator rejected RSS feed");
                SubmissionOutcome::failed(format!("Aggregator responded with {status}"))
            }
            Err(e) if e.is_timeout() => {
                warn!(endpoint, "RSS submission timed out");
                SubmissionOutcome::failed("Aggregator did not respond in time")
            }
            Err(e) => {
                warn!(endpoint, error = %e, "RSS submission failed");
                SubmissionOutcome::failed(format!("Failed to submit RSS feed: {e}"))
            }
        }
    }
}
