//! Resource service
//!
//! Validation and not-found handling for the curated link list. Role checks
//! happen in the API layer; by the time a call reaches this service the
//! caller is already authorized.

use crate::db::repositories::ResourceRepository;
use crate::models::{Resource, ResourceFields, ResourceInput};
use std::sync::Arc;

/// Error types for resource operations
#[derive(Debug, thiserror::Error)]
pub enum ResourceServiceError {
    /// Title or URL missing or blank
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No resource with this id
    #[error("Resource not found: {0}")]
    NotFound(i64),

    /// Store failure
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct ResourceService {
    repo: Arc<dyn ResourceRepository>,
}

impl ResourceService {
    pub fn new(repo: Arc<dyn ResourceRepository>) -> Self {
        Self { repo }
    }

    /// All resources, newest first
    pub async fn list(&self) -> Result<Vec<Resource>, ResourceServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn create(&self, input: ResourceInput) -> Result<Resource, ResourceServiceError> {
        let fields = validate(input)?;
        let resource = self.repo.create(&fields).await?;
        tracing::info!(id = resource.id, "Resource created");
        Ok(resource)
    }

    pub async fn update(&self, id: i64, input: ResourceInput) -> Result<Resource, ResourceServiceError> {
        let fields = validate(input)?;
        let resource = self
            .repo
            .update(id, &fields)
            .await?
            .ok_or(ResourceServiceError::NotFound(id))?;
        tracing::info!(id, "Resource updated");
        Ok(resource)
    }

    /// Delete a resource and return it so callers can quote its title.
    pub async fn delete(&self, id: i64) -> Result<Resource, ResourceServiceError> {
        let resource = self
            .repo
            .delete(id)
            .await?
            .ok_or(ResourceServiceError::NotFound(id))?;
        tracing::info!(id, "Resource deleted");
        Ok(resource)
    }
}

/// Title and URL are required and may not be blank; description defaults to "".
fn validate(input: ResourceInput) -> Result<ResourceFields, ResourceServiceError> {
    let title = input.title.map(|t| t.trim().to_string()).unwrap_or_default();
    let url = input.url.map(|u| u.trim().to_string()).unwrap_or_default();

    if title.is_empty() || url.is_empty() {
        return Err(ResourceServiceError::ValidationError(
            "title and url are required".to_string(),
        ));
    }

    Ok(ResourceFields {
        title,
        description: input.description.unwrap_or_default(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxResourceRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> ResourceService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        ResourceService::new(SqlxResourceRepository::boxed(pool))
    }

    #[test]
    fn test_validate_requires_title_and_url() {
        assert!(validate(ResourceInput::new("", Some(String::new()), "https://x")).is_err());
        assert!(validate(ResourceInput::new("T", None, "")).is_err());
        assert!(validate(ResourceInput::new("   ", None, "https://x")).is_err());
        assert!(validate(ResourceInput::default()).is_err());
    }

    #[test]
    fn test_validate_defaults_description() {
        let fields = validate(ResourceInput::new(" T ", None, "https://x")).unwrap();
        assert_eq!(fields.title, "T");
        assert_eq!(fields.description, "");
        assert_eq!(fields.url, "https://x");
    }

    #[tokio::test]
    async fn test_create_empty_title_fails() {
        let service = setup().await;
        let result = service.create(ResourceInput::new("", Some(String::new()), "https://x")).await;
        assert!(matches!(result, Err(ResourceServiceError::ValidationError(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_resource_listed_first() {
        let service = setup().await;
        service.create(ResourceInput::new("Older", None, "https://older")).await.unwrap();
        let created = service
            .create(ResourceInput::new("T", Some(String::new()), "https://x"))
            .await
            .unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], created);
    }

    #[tokio::test]
    async fn test_update_nonexistent_is_not_found() {
        let service = setup().await;
        let result = service.update(9999, ResourceInput::new("T", None, "https://x")).await;
        assert!(matches!(result, Err(ResourceServiceError::NotFound(9999))));
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let service = setup().await;
        let result = service.update(9999, ResourceInput::new("", None, "https://x")).await;
        assert!(matches!(result, Err(ResourceServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let service = setup().await;
        let keep = service.create(ResourceInput::new("Keep", None, "https://keep")).await.unwrap();
        let drop = service.create(ResourceInput::new("Drop", None, "https://drop")).await.unwrap();

        let deleted = service.delete(drop.id).await.unwrap();
        assert_eq!(deleted.title, "Drop");

        let ids: Vec<i64> = service.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![keep.id]);
        assert!(matches!(service.delete(drop.id).await, Err(ResourceServiceError::NotFound(_))));
    }
}
