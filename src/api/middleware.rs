//! API middleware
//!
//! Contains:
//! - `AppState` shared by every handler
//! - `ApiError`, the JSON error body and its status mapping
//! - Session extraction from the `auth-token` cookie
//! - `require_auth` / `require_admin` for the JSON API
//! - `route_guard`, the page-navigation interceptor

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::guard::{self, GuardDecision};
use crate::db::DynDatabasePool;
use crate::services::{AuthService, ResourceService, SessionClaims, SESSION_COOKIE, SESSION_TTL_SECS};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub auth_service: Arc<AuthService>,
    pub resource_service: Arc<ResourceService>,
    /// Add `Secure` to session cookies (production)
    pub secure_cookies: bool,
    /// Directory the front-end pages are served from
    pub web_root: Arc<PathBuf>,
}

/// Verified session attached to the request by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub SessionClaims);

/// Error response for API errors.
///
/// Serialized as `{"error": "<message>"}`; the pages render `error` as text.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Generic 500. Callers log the cause; the client only sees the fixed text.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, messages::SERVER_ERROR)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// User-facing messages
pub mod messages {
    pub const LOGIN_SUCCESS: &str = "ログインに成功しました";
    pub const LOGOUT_SUCCESS: &str = "ログアウトしました";
    pub const PASSWORD_REQUIRED: &str = "パスワードが必要です";
    pub const PASSWORD_INCORRECT: &str = "パスワードが正しくありません";
    pub const AUTH_REQUIRED: &str = "認証が必要です";
    pub const INVALID_TOKEN: &str = "無効なトークンです";
    pub const ADMIN_REQUIRED: &str = "管理者権限が必要です";
    pub const RESOURCE_CREATED: &str = "リソースが追加されました";
    pub const RESOURCE_UPDATED: &str = "リソースが更新されました";
    pub const RESOURCE_FIELDS_REQUIRED: &str = "タイトルとURLは必須です";
    pub const RESOURCE_NOT_FOUND: &str = "リソースが見つかりません";
    pub const INVALID_REQUEST: &str = "リクエストの形式が正しくありません";
    pub const SERVER_ERROR: &str = "サーバーエラーが発生しました";

    pub fn resource_deleted(title: &str) -> String {
        format!("「{}」が削除されました", title)
    }
}

/// Extract the session token from the `auth-token` cookie.
///
/// An empty value (what logout leaves behind) counts as no token.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, secure: bool) -> String {
    cookie_with(token, SESSION_TTL_SECS, secure)
}

/// `Set-Cookie` value that overwrites the session with an expired empty one
pub fn clear_session_cookie(secure: bool) -> String {
    cookie_with("", 0, secure)
}

fn cookie_with(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Authentication middleware for the JSON API.
///
/// Re-verifies the token on every call; the page guard does not cover `/api`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized(messages::AUTH_REQUIRED))?;

    let claims = state
        .auth_service
        .validate_session(&token)
        .ok_or_else(|| ApiError::unauthorized(messages::INVALID_TOKEN))?;

    request.extensions_mut().insert(AuthenticatedSession(claims));
    Ok(next.run(request).await)
}

/// Admin authorization middleware; must run after `require_auth`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<AuthenticatedSession>()
        .ok_or_else(|| ApiError::unauthorized(messages::AUTH_REQUIRED))?;

    if !session.0.role.is_admin() {
        return Err(ApiError::forbidden(messages::ADMIN_REQUIRED));
    }

    Ok(next.run(request).await)
}

/// Page-navigation guard.
///
/// Runs on every request; the decision itself lives in `guard::decide`.
pub async fn route_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let token = extract_session_token(request.headers());
        guard::decide(
            request.uri().path(),
            token.as_deref(),
            state.auth_service.tokens(),
        )
    };

    match decision {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(path = %request.uri().path(), redirect = target, "Redirecting to login");
            Redirect::temporary(target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_extract_session_token_from_cookie() {
        let headers = headers_with_cookie("theme=dark; auth-token=abc.def; lang=ja");
        assert_eq!(extract_session_token(&headers), Some("abc.def".to_string()));
    }

    #[test]
    fn test_extract_session_token_none() {
        assert!(extract_session_token(&HeaderMap::new()).is_none());
        assert!(extract_session_token(&headers_with_cookie("session=abc")).is_none());
        assert!(extract_session_token(&headers_with_cookie("xauth-token=abc")).is_none());
    }

    #[test]
    fn test_extract_session_token_empty_value_is_none() {
        assert!(extract_session_token(&headers_with_cookie("auth-token=")).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", false);
        assert_eq!(cookie, "auth-token=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400");

        let secure = session_cookie("tok", true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_session_cookie() {
        assert_eq!(
            clear_session_cookie(false),
            "auth-token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn test_api_error_status_mapping() {
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = ApiError::internal_error();
        assert_eq!(error.error, messages::SERVER_ERROR);
    }

    #[test]
    fn test_api_error_body_is_plain_message() {
        let body = serde_json::to_value(ApiError::forbidden(messages::ADMIN_REQUIRED)).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "管理者権限が必要です" }));
    }
}
