//! DTOs for entity management.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::non_blank;
use crate::domain::entities::{Entity, EntityProfile};

/// Request body for `POST /api/entities` and `PUT /api/entities/{id}`.
///
/// `PUT` replaces the whole profile: omitted optional fields are cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct EntityRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required (max 255 characters)"))]
    pub company_name: String,

    pub company_address: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 500))]
    pub google_business_profile_url: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 255))]
    pub website_url: Option<String>,

    #[validate(length(max = 100))]
    pub industry: Option<String>,

    #[validate(length(max = 100))]
    pub pr_contact_first_name: Option<String>,

    #[validate(length(max = 100))]
    pub pr_contact_last_name: Option<String>,

    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub pr_email: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 255))]
    pub facebook_url: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 255))]
    pub twitter_url: Option<String>,

    #[validate(url(message = "Invalid URL format"), length(max = 255))]
    pub reddit_url: Option<String>,
}

impl EntityRequest {
    /// Trims the company name and drops blank optional fields.
    pub fn normalized(self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            company_address: non_blank(self.company_address),
            google_business_profile_url: non_blank(self.google_business_profile_url),
            website_url: non_blank(self.website_url),
            industry: non_blank(self.industry),
            pr_contact_first_name: non_blank(self.pr_contact_first_name),
            pr_contact_last_name: non_blank(self.pr_contact_last_name),
            pr_email: non_blank(self.pr_email),
            facebook_url: non_blank(self.facebook_url),
            twitter_url: non_blank(self.twitter_url),
            reddit_url: non_blank(self.reddit_url),
        }
    }
}

impl From<EntityRequest> for EntityProfile {
    fn from(req: EntityRequest) -> Self {
        Self {
            company_name: req.company_name,
            company_address: req.company_address,
            google_business_profile_url: req.google_business_profile_url,
            website_url: req.website_url,
            industry: req.industry,
            pr_contact_first_name: req.pr_contact_first_name,
            pr_contact_last_name: req.pr_contact_last_name,
            pr_email: req.pr_email,
            facebook_url: req.facebook_url,
            twitter_url: req.twitter_url,
            reddit_url: req.reddit_url,
        }
    }
}

/// Response containing the caller's entities.
#[derive(Debug, Serialize)]
pub struct EntityListResponse {
    pub items: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> EntityRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_blank_optionals_pass_validation() {
        let req = parse(json!({
            "company_name": "  Acme  ",
            "website_url": "",
            "pr_email": " "
        }))
        .normalized();

        assert!(req.validate().is_ok());
        assert_eq!(req.company_name, "Acme");
        assert!(req.website_url.is_none());
        assert!(req.pr_email.is_none());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let req = parse(json!({ "company_name": "Acme", "pr_email": "not-an-email" })).normalized();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let req = parse(json!({ "company_name": "Acme", "website_url": "acme" })).normalized();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_company_name_rejected() {
        let req = parse(json!({ "company_name": "   " })).normalized();
        assert!(req.validate().is_err());
    }
}
