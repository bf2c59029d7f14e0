//! Resource model: one curated link shown to students

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A curated link record.
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Body accepted by both create and update.
///
/// Every field is optional at the wire level so that a missing title or URL
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ResourceInput {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description,
            url: Some(url.into()),
        }
    }
}

/// Validated values ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFields {
    pub title: String,
    pub description: String,
    pub url: String,
}
