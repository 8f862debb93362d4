//! DTOs for press release endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::non_blank;
use crate::domain::entities::{PressRelease, ReleaseContent, ReleaseStatus};

/// Request body for `POST /api/press-releases` and `PUT /api/press-releases/{id}`.
///
/// `PUT` replaces the whole content; status is only changed through the
/// publish/report endpoints and `pr_id` is never client-controlled.
#[derive(Debug, Deserialize, Validate)]
pub struct PressReleaseRequest {
    pub entity_id: Option<String>,

    #[validate(length(min = 1, max = 70, message = "Headline must be 1-70 characters"))]
    pub headline: String,

    #[validate(length(max = 120, message = "Subheadline must be at most 120 characters"))]
    pub subheadline: Option<String>,

    #[validate(length(max = 100))]
    pub dateline_city: Option<String>,

    #[validate(length(max = 100))]
    pub dateline_state: Option<String>,

    pub dateline_date: Option<DateTime<Utc>>,

    pub lead_paragraph: Option<String>,
    pub body_content: Option<String>,
    pub boilerplate: Option<String>,
    pub call_to_action: Option<String>,

    #[validate(length(max = 255))]
    pub media_contact_name: Option<String>,

    #[validate(length(max = 255))]
    pub media_contact_title: Option<String>,

    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub media_contact_email: Option<String>,

    #[validate(length(max = 50))]
    pub media_contact_phone: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 255))]
    pub media_contact_website: Option<String>,

    #[validate(length(max = 255))]
    pub author_name: Option<String>,

    #[validate(length(max = 255))]
    pub author_title: Option<String>,

    #[validate(length(max = 255))]
    pub author_company: Option<String>,

    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub author_email: Option<String>,

    #[validate(length(max = 100))]
    pub author_social_handle: Option<String>,

    #[validate(length(max = 255))]
    pub meta_title: Option<String>,

    pub meta_description: Option<String>,
    pub keywords: Option<String>,
}

impl PressReleaseRequest {
    /// Trims the headline and drops blank optional fields.
    pub fn normalized(self) -> Self {
        Self {
            entity_id: non_blank(self.entity_id),
            headline: self.headline.trim().to_string(),
            subheadline: non_blank(self.subheadline),
            dateline_city: non_blank(self.dateline_city),
            dateline_state: non_blank(self.dateline_state),
            dateline_date: self.dateline_date,
            lead_paragraph: non_blank(self.lead_paragraph),
            body_content: non_blank(self.body_content),
            boilerplate: non_blank(self.boilerplate),
            call_to_action: non_blank(self.call_to_action),
            media_contact_name: non_blank(self.media_contact_name),
            media_contact_title: non_blank(self.media_contact_title),
            media_contact_email: non_blank(self.media_contact_email),
            media_contact_phone: non_blank(self.media_contact_phone),
            media_contact_website: non_blank(self.media_contact_website),
            author_name: non_blank(self.author_name),
            author_title: non_blank(self.author_title),
            author_company: non_blank(self.author_company),
            author_email: non_blank(self.author_email),
            author_social_handle: non_blank(self.author_social_handle),
            meta_title: non_blank(self.meta_title),
            meta_description: non_blank(self.meta_description),
            keywords: non_blank(self.keywords),
        }
    }

    /// Splits the request into the entity reference and the release content.
    pub fn into_parts(self) -> (Option<String>, ReleaseContent) {
        let content = ReleaseContent {
            headline: self.headline,
            subheadline: self.subheadline,
            dateline_city: self.dateline_city,
            dateline_state: self.dateline_state,
            dateline_date: self.dateline_date,
            lead_paragraph: self.lead_paragraph,
            body_content: self.body_content,
            boilerplate: self.boilerplate,
            call_to_action: self.call_to_action,
            media_contact_name: self.media_contact_name,
            media_contact_title: self.media_contact_title,
            media_contact_email: self.media_contact_email,
            media_contact_phone: self.media_contact_phone,
            media_contact_website: self.media_contact_website,
            author_name: self.author_name,
            author_title: self.author_title,
            author_company: self.author_company,
            author_email: self.author_email,
            author_social_handle: self.author_social_handle,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            keywords: self.keywords,
        };

        (self.entity_id, content)
    }
}

/// Query parameters for `GET /api/press-releases`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListPressReleasesParams {
    /// Only return releases in this status.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<ReleaseStatus>,
}

/// Response containing the caller's press releases.
#[derive(Debug, Serialize)]
pub struct PressReleaseListResponse {
    pub items: Vec<PressRelease>,
}
