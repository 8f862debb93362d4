//! Press release entity and its publication lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Entity;

/// Publication status of a press release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    #[default]
    Draft,
    Published,
    Reporting,
}

impl ReleaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Reporting => "reporting",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown press release status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ReleaseStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "reporting" => Ok(Self::Reporting),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move press release from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: ReleaseStatus,
    pub to: ReleaseStatus,
}

/// Editable body of a press release.
///
/// Length limits (`headline` ≤ 70, `subheadline` ≤ 120 characters) are
/// enforced at the API boundary; everything downstream treats the values
/// as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseContent {
    pub headline: String,
    pub subheadline: Option<String>,
    pub dateline_city: Option<String>,
    pub dateline_state: Option<String>,
    pub dateline_date: Option<DateTime<Utc>>,
    pub lead_paragraph: Option<String>,
    pub body_content: Option<String>,
    pub boilerplate: Option<String>,
    pub call_to_action: Option<String>,
    pub media_contact_name: Option<String>,
    pub media_contact_title: Option<String>,
    pub media_contact_email: Option<String>,
    pub media_contact_phone: Option<String>,
    pub media_contact_website: Option<String>,
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub author_company: Option<String>,
    pub author_email: Option<String>,
    pub author_social_handle: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
}

/// A press release, the unit of syndication.
///
/// `pr_id` is the human-facing sequential code (`RW10000`, ...), distinct from
/// the opaque `id`. Once assigned it never changes.
#[derive(Debug, Clone, Serialize)]
pub struct PressRelease {
    pub id: String,
    pub user_id: String,
    pub entity_id: Option<String>,
    pub pr_id: Option<String>,
    pub status: ReleaseStatus,
    #[serde(flatten)]
    pub content: ReleaseContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PressRelease {
    /// Builds a freshly created draft from its creation input.
    pub fn draft(new: NewPressRelease, pr_id: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            user_id: new.user_id,
            entity_id: new.entity_id,
            pr_id,
            status: ReleaseStatus::Draft,
            content: new.content,
            created_at,
            updated_at: created_at,
            published_at: None,
        }
    }

    /// Returns true if `user_id` owns this press release.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Only published releases are syndicated.
    pub fn is_published(&self) -> bool {
        self.status == ReleaseStatus::Published
    }

    /// Published and reporting releases have a public page.
    pub fn is_publicly_visible(&self) -> bool {
        self.published_at.is_some() && self.status != ReleaseStatus::Draft
    }

    /// Moves the release to `to`.
    ///
    /// `published_at` is stamped on the first transition to
    /// [`ReleaseStatus::Published`] and never overwritten afterwards. No
    /// status can return to [`ReleaseStatus::Draft`].
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] for a transition back to draft.
    pub fn transition_to(
        &mut self,
        to: ReleaseStatus,
        now: DateTime<Utc>,
    ) -> Result<(), StatusTransitionError> {
        if self.status == to {
            return Ok(());
        }

        if to == ReleaseStatus::Draft {
            return Err(StatusTransitionError {
                from: self.status,
                to,
            });
        }

        if to == ReleaseStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }

        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}

/// Input data for creating a new press release.
#[derive(Debug, Clone)]
pub struct NewPressRelease {
    pub id: String,
    pub user_id: String,
    pub entity_id: Option<String>,
    pub content: ReleaseContent,
}

/// A press release joined with its (optional) owning entity.
///
/// The entity is `None` when the release has no entity or the entity has
/// been deleted; consumers fall back to defaults.
#[derive(Debug, Clone)]
pub struct PressReleaseWithEntity {
    pub release: PressRelease,
    pub entity: Option<Entity>,
}

impl PressReleaseWithEntity {
    pub fn new(release: PressRelease, entity: Option<Entity>) -> Self {
        Self { release, entity }
    }
}
