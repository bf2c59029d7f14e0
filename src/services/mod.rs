//! Services layer - Business logic
//!
//! - `credentials`: shared-password check per role
//! - `token`: signed session tokens
//! - `auth`: login and session validation built on the two above
//! - `resource`: validation and not-found handling for the link list

pub mod auth;
pub mod credentials;
pub mod resource;
pub mod token;

pub use auth::{AuthService, AuthServiceError, LoginOutcome};
pub use credentials::CredentialChecker;
pub use resource::{ResourceService, ResourceServiceError};
pub use token::{SessionClaims, TokenError, TokenService, SESSION_COOKIE, SESSION_TTL_SECS};
