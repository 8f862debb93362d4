//! RSS 2.0 feed generation for published press releases.
//!
//! Generation is split in two independently testable steps:
//!
//! 1. [`RssItem::from_release`] maps a release (and its optional entity) to
//!    an item.
//! 2. [`xml::render_channel`] serializes the items into the final document.
//!
//! [`generate_feed`] ties both together and drops every release that is not
//! published.

pub mod item;
pub mod xml;

use chrono::{DateTime, Utc};

use crate::domain::entities::PressReleaseWithEntity;

pub use item::RssItem;

/// Content type of every served or submitted feed.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Generates a feed stamped with the current time.
pub fn generate_feed(releases: &[PressReleaseWithEntity], base_url: &str) -> String {
    generate_feed_at(releases, base_url, Utc::now())
}

/// Generates a feed with an explicit `lastBuildDate`.
pub fn generate_feed_at(
    releases: &[PressReleaseWithEntity],
    base_url: &str,
    built_at: DateTime<Utc>,
) -> String {
    let items: Vec<RssItem> = releases
        .iter()
        .filter(|joined| joined.release.is_published())
        .map(|joined| RssItem::from_release(joined, base_url))
        .collect();

    xml::render_channel(&items, base_url, built_at)
}
