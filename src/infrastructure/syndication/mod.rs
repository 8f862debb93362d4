//! Submission of generated feeds to the third-party aggregator.
//!
//! Provides a [`FeedSubmitter`] trait with two implementations:
//! - [`HttpFeedSubmitter`] - POSTs the feed to the aggregator endpoint
//! - [`DryRunSubmitter`] - Logs the feed and reports success (no endpoint configured)
//!
//! Submission is best-effort: failures are reported as a
//! [`SubmissionOutcome`] and never retried.

mod dry_run;
mod http;

pub use dry_run::DryRunSubmitter;
pub use http::HttpFeedSubmitter;

use async_trait::async_trait;
use serde::Serialize;

/// Result of a single submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmissionOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Sends an RSS document to an aggregator.
///
/// Implementations must not return errors: every failure is folded into a
/// [`SubmissionOutcome`] with `success == false` and a user-facing message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSubmitter: Send + Sync {
    /// Submits `rss` to `endpoint`, or to the configured default endpoint.
    async fn submit(&self, rss: &str, endpoint: Option<String>) -> SubmissionOutcome;
}
