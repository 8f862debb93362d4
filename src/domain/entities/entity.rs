//! Entity representing a company or brand that press releases are issued for.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A company/brand owned by a single user account.
///
/// Press releases reference an entity optionally; deleting an entity detaches
/// its releases instead of deleting them.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub profile: EntityProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable company profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityProfile {
    pub company_name: String,
    pub company_address: Option<String>,
    pub google_business_profile_url: Option<String>,
    pub website_url: Option<String>,
    pub industry: Option<String>,
    pub pr_contact_first_name: Option<String>,
    pub pr_contact_last_name: Option<String>,
    pub pr_email: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub reddit_url: Option<String>,
}

impl Entity {
    /// Creates a new Entity instance.
    pub fn new(
        id: String,
        user_id: String,
        profile: EntityProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            profile,
            created_at,
            updated_at,
        }
    }

    /// Returns true if `user_id` owns this entity.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn company_name(&self) -> &str {
        &self.profile.company_name
    }

    /// Industry label, ignoring blank values.
    pub fn industry(&self) -> Option<&str> {
        self.profile.industry.as_deref().filter(|s| !s.is_empty())
    }
}

/// Input data for creating a new entity.
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub id: String,
    pub user_id: String,
    pub profile: EntityProfile,
}
