//! Small helpers shared across layers.
//!
//! - [`id_generator`] - Opaque record id generation
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod id_generator;
