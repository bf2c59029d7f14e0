//! Authentication API endpoints
//!
//! - POST /api/auth/login - Password login for the student or admin role
//! - POST /api/auth/logout - Clear the session cookie
//! - GET /api/auth/check - Report the role of the current session

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::middleware::{
    clear_session_cookie, extract_session_token, messages, session_cookie, ApiError, AppState,
};
use crate::models::Role;
use crate::services::AuthServiceError;

/// Request body for login.
///
/// Both fields accept any JSON value. `isAdmin` counts when truthy (`true`,
/// `1`, `"yes"`); a truthy non-string password is simply wrong.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<Value>,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Build the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check", get(check))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!("Rejected login body: {}", e);
        ApiError::validation_error(messages::INVALID_REQUEST)
    })?;

    let as_admin = body.is_admin.as_ref().is_some_and(is_truthy);
    let password = match body.password {
        Some(Value::String(password)) => Some(password),
        Some(other) if is_truthy(&other) => {
            tracing::warn!(admin = as_admin, "Login failed: password is not a string");
            return Err(ApiError::unauthorized(messages::PASSWORD_INCORRECT));
        }
        _ => None,
    };

    let outcome = state
        .auth_service
        .login(password.as_deref(), as_admin)
        .map_err(|e| match e {
            AuthServiceError::MissingPassword => ApiError::validation_error(messages::PASSWORD_REQUIRED),
            AuthServiceError::InvalidPassword(role) => {
                tracing::warn!(%role, "Login failed: wrong password");
                ApiError::unauthorized(messages::PASSWORD_INCORRECT)
            }
            AuthServiceError::Token(e) => {
                tracing::error!("Failed to issue session token: {}", e);
                ApiError::internal_error()
            }
        })?;

    tracing::info!(role = %outcome.role, "Login succeeded");

    let headers = set_cookie_headers(&session_cookie(&outcome.token, state.secure_cookies))?;
    Ok((
        headers,
        Json(LoginResponse {
            success: true,
            role: outcome.role,
            message: messages::LOGIN_SUCCESS.to_string(),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so this only overwrites the cookie.
async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let headers = set_cookie_headers(&clear_session_cookie(state.secure_cookies))?;
    Ok((
        headers,
        Json(LogoutResponse {
            success: true,
            message: messages::LOGOUT_SUCCESS.to_string(),
        }),
    ))
}

/// GET /api/auth/check
async fn check(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let claims = extract_session_token(&headers).and_then(|t| state.auth_service.validate_session(&t));

    match claims {
        Some(claims) => Json(CheckResponse {
            authenticated: true,
            role: Some(claims.role),
        })
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(CheckResponse {
                authenticated: false,
                role: None,
            }),
        )
            .into_response(),
    }
}

/// JSON truthiness as browsers see it: `null`, `false`, `0` and `""` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn set_cookie_headers(cookie: &str) -> Result<HeaderMap, ApiError> {
    let value = HeaderValue::from_str(cookie).map_err(|e| {
        tracing::error!("Invalid Set-Cookie value: {}", e);
        ApiError::internal_error()
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}
