//! Data models
//!
//! - `Resource`: the curated link entity and its write inputs
//! - `Role`: the two session roles

mod resource;
mod role;

pub use resource::{Resource, ResourceFields, ResourceInput};
pub use role::Role;
