//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Blank optional strings are folded into `None`
//! before validation runs.

pub mod entities;
pub mod feeds;
pub mod health;
pub mod press_releases;

/// Treats empty and whitespace-only strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
