//! API layer - HTTP handlers and routing
//!
//! It includes:
//! - Auth API endpoints (login, logout, session check)
//! - Resource API endpoints
//! - Health check
//! - The page route guard
//! - Static page serving for everything outside `/api`

pub mod auth;
pub mod guard;
pub mod health;
pub mod middleware;
pub mod resources;
pub mod static_files;


use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedSession};

/// Build the API router mounted under `/api`
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need admin role)
    let admin_routes = Router::new()
        .route("/resources", post(resources::create_resource))
        .route(
            "/resources/{id}",
            put(resources::update_resource).delete(resources::delete_resource),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (need any valid session)
    let protected_routes = Router::new()
        .route("/resources", get(resources::list_resources))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .nest("/auth", auth::router())
        .route("/health", get(health::health_check))
        .merge(admin_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    // Cookie auth needs credentials, so the origin must be explicit
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api", build_api_router(state.clone()))
        .fallback(static_files::serve_static)
        // Outermost first: trace, then the page guard, then CORS
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    middleware::route_guard,
                ))
                .layer(cors),
        )
        .with_state(state))
}
