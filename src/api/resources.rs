//! Resource API endpoints
//!
//! - GET /api/resources - Any valid session
//! - POST /api/resources - Admin only
//! - PUT /api/resources/{id} - Admin only
//! - DELETE /api/resources/{id} - Admin only
//!
//! Role checks are route layers in `api::build_api_router`; handlers here
//! assume the caller is already allowed.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::api::middleware::{messages, ApiError, AppState};
use crate::models::{Resource, ResourceInput};
use crate::services::ResourceServiceError;

#[derive(Serialize)]
struct ResourcesResponse {
    resources: Vec<Resource>,
}

#[derive(Serialize)]
struct ResourceResponse {
    success: bool,
    resource: Resource,
    message: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    message: String,
}

/// GET /api/resources
pub async fn list_resources(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let resources = state.resource_service.list().await.map_err(map_service_error)?;
    Ok(Json(ResourcesResponse { resources }))
}

/// POST /api/resources
pub async fn create_resource(
    State(state): State<AppState>,
    body: Result<Json<ResourceInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(reject_body)?;
    let resource = state
        .resource_service
        .create(body)
        .await
        .map_err(map_service_error)?;

    Ok(Json(ResourceResponse {
        success: true,
        resource,
        message: messages::RESOURCE_CREATED.to_string(),
    }))
}

/// PUT /api/resources/{id}
pub async fn update_resource(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ResourceInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(id)?;
    let Json(body) = body.map_err(reject_body)?;
    let resource = state
        .resource_service
        .update(id, body)
        .await
        .map_err(map_service_error)?;

    Ok(Json(ResourceResponse {
        success: true,
        resource,
        message: messages::RESOURCE_UPDATED.to_string(),
    }))
}

/// DELETE /api/resources/{id}
pub async fn delete_resource(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(id)?;
    let deleted = state.resource_service.delete(id).await.map_err(map_service_error)?;

    Ok(Json(DeleteResponse {
        success: true,
        message: messages::resource_deleted(&deleted.title),
    }))
}

/// A non-numeric id cannot name a stored resource
fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found(messages::RESOURCE_NOT_FOUND))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected resource body: {}", rejection);
    ApiError::validation_error(messages::INVALID_REQUEST)
}

fn map_service_error(e: ResourceServiceError) -> ApiError {
    match e {
        ResourceServiceError::ValidationError(_) => {
            ApiError::validation_error(messages::RESOURCE_FIELDS_REQUIRED)
        }
        ResourceServiceError::NotFound(_) => ApiError::not_found(messages::RESOURCE_NOT_FOUND),
        ResourceServiceError::InternalError(e) => {
            tracing::error!("Resource store failure: {:#}", e);
            ApiError::internal_error()
        }
    }
}
