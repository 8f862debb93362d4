//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the only behaviour they carry is the
//! press release status lifecycle.
//!
//! # Entity Types
//!
//! - [`Entity`] - A company/brand that press releases are issued for
//! - [`PressRelease`] - The syndicated content record
//!
//! # Design Pattern
//!
//! Separate structs are used for creation (`NewEntity`, `NewPressRelease`)
//! and for the editable parts of a record (`EntityProfile`, `ReleaseContent`).

pub mod entity;
pub mod press_release;

pub use entity::{Entity, EntityProfile, NewEntity};
pub use press_release::{
    NewPressRelease, PressRelease, PressReleaseWithEntity, ReleaseContent, ReleaseStatus,
    StatusTransitionError, UnknownStatus,
};
