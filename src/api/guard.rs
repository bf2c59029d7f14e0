//! Route guard decision
//!
//! Pure function from `(path, session token)` to pass-through or redirect.
//! Every request is judged on its own; no state is kept between requests.
//!
//! | path class  | no / invalid token | student       | admin |
//! |-------------|--------------------|---------------|-------|
//! | public      | pass               | pass          | pass  |
//! | bypass      | pass               | pass          | pass  |
//! | admin area  | → /admin/login     | → /login      | pass  |
//! | other       | → /login           | pass          | pass  |
//!
//! A student session reaching the admin area goes to the student login page,
//! not the admin one. That asymmetry is kept on purpose until someone decides
//! otherwise.

use crate::services::TokenService;

pub const STUDENT_LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

const PUBLIC_PATHS: &[&str] = &["/", STUDENT_LOGIN_PATH, ADMIN_LOGIN_PATH];
const ADMIN_PREFIX: &str = "/admin";
const BYPASS_PREFIXES: &[&str] = &["/_next", "/api"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Login pages and the landing page
    Public,
    /// Assets, API routes and anything that looks like a file
    Bypass,
    AdminArea,
    StudentArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(&'static str),
}

pub fn classify(path: &str) -> PathClass {
    if PUBLIC_PATHS.contains(&path) {
        PathClass::Public
    } else if BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.') {
        PathClass::Bypass
    } else if path.starts_with(ADMIN_PREFIX) {
        PathClass::AdminArea
    } else {
        PathClass::StudentArea
    }
}

pub fn decide(path: &str, token: Option<&str>, tokens: &TokenService) -> GuardDecision {
    let class = classify(path);
    let login_page = match class {
        PathClass::Public | PathClass::Bypass => return GuardDecision::Pass,
        PathClass::AdminArea => ADMIN_LOGIN_PATH,
        PathClass::StudentArea => STUDENT_LOGIN_PATH,
    };

    let Some(claims) = token.and_then(|t| tokens.verify(t)) else {
        return GuardDecision::Redirect(login_page);
    };

    if class == PathClass::AdminArea && !claims.role.is_admin() {
        return GuardDecision::Redirect(STUDENT_LOGIN_PATH);
    }

    GuardDecision::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::{Duration, Utc};

    fn tokens() -> TokenService {
        TokenService::new("guard-secret").unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("/"), PathClass::Public);
        assert_eq!(classify("/login"), PathClass::Public);
        assert_eq!(classify("/admin/login"), PathClass::Public);
        assert_eq!(classify("/_next/static/app.js"), PathClass::Bypass);
        assert_eq!(classify("/api/resources"), PathClass::Bypass);
        assert_eq!(classify("/favicon.ico"), PathClass::Bypass);
        assert_eq!(classify("/admin/logo.png"), PathClass::Bypass);
        assert_eq!(classify("/admin"), PathClass::AdminArea);
        assert_eq!(classify("/admin/dashboard"), PathClass::AdminArea);
        assert_eq!(classify("/resources"), PathClass::StudentArea);
        assert_eq!(classify("/login/"), PathClass::StudentArea);
    }

    #[test]
    fn test_no_token_admin_area_goes_to_admin_login() {
        assert_eq!(
            decide("/admin/dashboard", None, &tokens()),
            GuardDecision::Redirect("/admin/login")
        );
    }

    #[test]
    fn test_no_token_student_area_goes_to_login() {
        assert_eq!(decide("/resources", None, &tokens()), GuardDecision::Redirect("/login"));
    }

    #[test]
    fn test_invalid_token_same_as_missing() {
        let tokens = tokens();
        assert_eq!(decide("/admin", Some("forged"), &tokens), GuardDecision::Redirect("/admin/login"));
        assert_eq!(decide("/resources", Some("forged"), &tokens), GuardDecision::Redirect("/login"));

        let expired = tokens
            .issue_at(Role::Admin, Utc::now() - Duration::hours(25))
            .unwrap();
        assert_eq!(decide("/admin", Some(&expired), &tokens), GuardDecision::Redirect("/admin/login"));
    }

    #[test]
    fn test_student_in_admin_area_goes_to_student_login() {
        let tokens = tokens();
        let student = tokens.issue(Role::Student).unwrap();
        assert_eq!(decide("/admin", Some(&student), &tokens), GuardDecision::Redirect("/login"));
        assert_eq!(decide("/resources", Some(&student), &tokens), GuardDecision::Pass);
    }

    #[test]
    fn test_admin_passes_everywhere() {
        let tokens = tokens();
        let admin = tokens.issue(Role::Admin).unwrap();
        assert_eq!(decide("/admin", Some(&admin), &tokens), GuardDecision::Pass);
        assert_eq!(decide("/admin/dashboard", Some(&admin), &tokens), GuardDecision::Pass);
        assert_eq!(decide("/resources", Some(&admin), &tokens), GuardDecision::Pass);
    }

    #[test]
    fn test_public_and_bypass_never_inspect_token() {
        let tokens = tokens();
        for path in ["/", "/login", "/admin/login", "/api/resources", "/_next/x", "/a.css"] {
            assert_eq!(decide(path, None, &tokens), GuardDecision::Pass, "{}", path);
            assert_eq!(decide(path, Some("garbage"), &tokens), GuardDecision::Pass, "{}", path);
        }
    }
}
