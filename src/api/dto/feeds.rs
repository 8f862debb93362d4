//! DTOs for feed preview and aggregator submission.

use serde::Deserialize;
use validator::Validate;

use super::non_blank;

/// Query parameters for `GET /api/feed`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Restrict the feed to one of the caller's releases.
    pub press_release_id: Option<String>,
}

impl FeedQuery {
    pub fn press_release_id(&self) -> Option<&str> {
        self.press_release_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Optional request body for `POST /api/press-releases/{id}/submit`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Overrides the configured aggregator endpoint for this submission.
    #[validate(url(message = "Invalid URL format"))]
    pub endpoint: Option<String>,
}

impl SubmitRequest {
    pub fn normalized(self) -> Self {
        Self {
            endpoint: non_blank(self.endpoint),
        }
    }
}
