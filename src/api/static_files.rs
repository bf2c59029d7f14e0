//! Static page serving
//!
//! Every non-API path falls through to here. Pages are the front end's build
//! output under `server.web_root`:
//! - `/` → `index.html`
//! - `/login` → `login.html`, or `login/index.html`
//! - `/admin` → `admin.html`, or `admin/index.html`
//! - paths with an extension are served as-is, except `.html`
//!
//! Pages are only reachable through their extensionless paths, which the
//! route guard checks. A request naming `admin/index.html` directly is a 404.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::api::middleware::AppState;

/// Serve a page or asset from the web root
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    // URL decode the path to handle encoded characters like %20
    let decoded_path = urlencoding::decode(path).unwrap_or_else(|_| path.into());

    let Some(relative) = sanitize(&decoded_path) else {
        tracing::debug!(path, "Rejected static path");
        return not_found();
    };

    for candidate in candidates(&state.web_root, &relative) {
        if let Ok(contents) = fs::read(&candidate).await {
            return build_response(&candidate, contents);
        }
    }

    not_found()
}

/// Strip leading/trailing slashes; `None` if any segment escapes the root.
fn sanitize(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    let escapes = trimmed
        .split('/')
        .any(|segment| segment == ".." || segment.contains('\\'));
    if escapes {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Files to try, in order, for a sanitized relative path
fn candidates(root: &Path, relative: &str) -> Vec<PathBuf> {
    if relative.is_empty() {
        return vec![root.join("index.html")];
    }

    let file_name = relative.rsplit('/').next().unwrap_or(relative);
    if let Some((_, extension)) = file_name.rsplit_once('.') {
        if is_page_extension(extension) {
            return Vec::new();
        }
        return vec![root.join(relative)];
    }

    vec![
        root.join(format!("{}.html", relative)),
        root.join(relative).join("index.html"),
    ]
}

fn is_page_extension(extension: &str) -> bool {
    extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm")
}

fn build_response(path: &Path, contents: Vec<u8>) -> Response {
    let content_type = get_content_type(path);
    let cache_control = if content_type.starts_with("text/html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        contents,
    )
        .into_response()
}

/// 404 response
fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body><h1>404 Not Found</h1></body></html>",
    )
        .into_response()
}

/// Get content type from file extension
fn get_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_rejects_parent_segments() {
        assert_eq!(sanitize("/"), Some(String::new()));
        assert_eq!(sanitize("/admin/"), Some("admin".to_string()));
        assert!(sanitize("/../etc/passwd").is_none());
        assert!(sanitize("/admin/../../secret").is_none());
        assert!(sanitize("/a\\..\\b").is_none());
    }

    #[test]
    fn test_candidates() {
        let root = Path::new("web");
        assert_eq!(candidates(root, ""), vec![root.join("index.html")]);
        assert_eq!(
            candidates(root, "login"),
            vec![root.join("login.html"), root.join("login").join("index.html")]
        );
        assert_eq!(candidates(root, "_next/app.js"), vec![root.join("_next/app.js")]);
    }

    #[test]
    fn test_page_files_not_addressable_directly() {
        let root = Path::new("web");
        assert!(candidates(root, "admin/index.html").is_empty());
        assert!(candidates(root, "resources.html").is_empty());
        assert!(candidates(root, "login.HTM").is_empty());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(get_content_type(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Path::new("app.js")), "application/javascript");
        assert_eq!(get_content_type(Path::new("blob")), "application/octet-stream");
    }
}
