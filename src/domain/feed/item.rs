//! Mapping from a press release (plus optional entity) to an RSS item.

use chrono::{DateTime, Utc};

use crate::domain::entities::{PressRelease, PressReleaseWithEntity};

/// Company name used in the boilerplate heading when no entity is attached.
pub const DEFAULT_COMPANY_NAME: &str = "the Company";

/// Author name used in `dc:creator` when only an email is known.
pub const DEFAULT_AUTHOR_NAME: &str = "Author";

/// Separator placed between rendered content blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// One `<item>` of the feed, before XML serialization.
///
/// `description` and `content` carry HTML; every other field is plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: DateTime<Utc>,
    pub guid: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub categories: Vec<String>,
}

impl RssItem {
    /// Maps a release to its RSS item.
    pub fn from_release(joined: &PressReleaseWithEntity, base_url: &str) -> Self {
        let release = &joined.release;
        let company = joined.entity.as_ref().map(|e| e.company_name());
        let industry = joined.entity.as_ref().and_then(|e| e.industry());

        Self {
            title: release.content.headline.clone(),
            description: description(release),
            link: release_link(base_url, &release.id),
            pub_date: release.published_at.unwrap_or(release.created_at),
            guid: release.id.clone(),
            content: assemble_content(&content_blocks(release, company)),
            author: author(release),
            categories: categories(industry, release.content.keywords.as_deref()),
        }
    }
}

/// A self-contained section of `content:encoded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock<'a> {
    /// Raw body HTML, emitted verbatim.
    Body(&'a str),
    About {
        company: &'a str,
        boilerplate: &'a str,
    },
    CallToAction(&'a str),
    MediaContact(MediaContact<'a>),
}

/// Media contact details; rendered only when a name or email is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContact<'a> {
    pub name: Option<&'a str>,
    pub title: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
}

impl MediaContact<'_> {
    fn is_reachable(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let heading: Vec<&str> = [self.name, self.title].into_iter().flatten().collect();
        if !heading.is_empty() {
            lines.push(heading.join(", "));
        }
        if let Some(email) = self.email {
            lines.push(format!("Email: {email}"));
        }
        if let Some(phone) = self.phone {
            lines.push(format!("Phone: {phone}"));
        }
        if let Some(website) = self.website {
            lines.push(format!("Website: {website}"));
        }

        lines
    }
}

impl ContentBlock<'_> {
    /// Renders the block as HTML.
    pub fn render(&self) -> String {
        match self {
            Self::Body(html) => (*html).to_string(),
            Self::About {
                company,
                boilerplate,
            } => format!("<p>About {company}: {boilerplate}</p>"),
            Self::CallToAction(text) => format!("<p>{text}</p>"),
            Self::MediaContact(contact) => format!(
                "<p><strong>Media Contact:</strong><br/>{}</p>",
                contact.lines().join("<br/>")
            ),
        }
    }
}

/// Collects the content blocks of a release in feed order.
pub fn content_blocks<'a>(
    release: &'a PressRelease,
    company: Option<&'a str>,
) -> Vec<ContentBlock<'a>> {
    let content = &release.content;
    let mut blocks = Vec::new();

    if let Some(body) = present(&content.body_content) {
        blocks.push(ContentBlock::Body(body));
    }

    if let Some(boilerplate) = present(&content.boilerplate) {
        blocks.push(ContentBlock::About {
            company: company
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_COMPANY_NAME),
            boilerplate,
        });
    }

    if let Some(cta) = present(&content.call_to_action) {
        blocks.push(ContentBlock::CallToAction(cta));
    }

    let contact = MediaContact {
        name: present(&content.media_contact_name),
        title: present(&content.media_contact_title),
        email: present(&content.media_contact_email),
        phone: present(&content.media_contact_phone),
        website: present(&content.media_contact_website),
    };
    if contact.is_reachable() {
        blocks.push(ContentBlock::MediaContact(contact));
    }

    blocks
}

/// Joins rendered blocks; `None` when there is nothing to render.
pub fn assemble_content(blocks: &[ContentBlock<'_>]) -> Option<String> {
    if blocks.is_empty() {
        return None;
    }

    Some(
        blocks
            .iter()
            .map(ContentBlock::render)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR),
    )
}

/// Dateline prefix followed by the lead paragraph (or subheadline).
pub fn description(release: &PressRelease) -> String {
    let content = &release.content;
    let mut description = String::new();

    let date = content
        .dateline_date
        .map(|d| d.format("%B %-d, %Y").to_string());
    let parts: Vec<&str> = [
        present(&content.dateline_city),
        present(&content.dateline_state),
        date.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !parts.is_empty() {
        description.push_str(&parts.join(", "));
        description.push_str(" - ");
    }

    let summary = present(&content.lead_paragraph)
        .or_else(|| present(&content.subheadline))
        .unwrap_or_default();
    description.push_str(summary);

    description
}

/// Public page of a release; the target of every item `<link>`.
pub fn release_link(base_url: &str, id: &str) -> String {
    format!("{}/press-releases/{}/view", base_url.trim_end_matches('/'), id)
}

fn author(release: &PressRelease) -> Option<String> {
    let email = present(&release.content.author_email)?;
    let name = present(&release.content.author_name).unwrap_or(DEFAULT_AUTHOR_NAME);
    Some(format!("{email} ({name})"))
}

/// Industry first, then each trimmed, non-empty keyword.
pub fn categories(industry: Option<&str>, keywords: Option<&str>) -> Vec<String> {
    industry
        .filter(|i| !i.is_empty())
        .into_iter()
        .chain(
            keywords
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        )
        .map(str::to_string)
        .collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
