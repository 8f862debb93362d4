//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the two pure subsystems the rest
//! of the service is built around, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`identifier`] - Sequential `RW<n>` press release identifiers
//! - [`feed`] - RSS 2.0 feed generation
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Identifier allocation and feed generation are synchronous and pure; the
//!   services in [`crate::application::services`] feed them with stored data

pub mod entities;
pub mod feed;
pub mod identifier;
pub mod repositories;
