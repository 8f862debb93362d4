//! Middleware stacked around the API and public routes.
//!
//! - [`auth`] resolves a bearer token to the calling user
//! - [`rate_limit`] applies per-IP quotas, one tier per surface
//! - [`tracing`] opens a span per request

pub mod auth;
pub mod rate_limit;
pub mod tracing;
