//! Database repositories
//!
//! Repository pattern implementations for database access.

pub mod resource;

pub use resource::{ResourceRepository, SqlxResourceRepository};
