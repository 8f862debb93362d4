//! JSON API under `/api`.
//!
//! Every route here acts on behalf of the user owning the bearer token; the
//! handlers are thin and delegate to [`crate::application::services`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
