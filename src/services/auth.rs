//! Auth service
//!
//! Ties the credential check to token issuance:
//! - `login`: password + requested role → signed session token
//! - `validate_session`: token → claims, or `None` for anything invalid

use crate::config::AuthConfig;
use crate::models::Role;
use crate::services::credentials::CredentialChecker;
use crate::services::token::{SessionClaims, TokenError, TokenService};

/// Error types for login
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// No password (or an empty one) was submitted
    #[error("Password is required")]
    MissingPassword,

    /// The password does not match the requested role's secret
    #[error("Invalid password for role {0}")]
    InvalidPassword(Role),

    /// Token could not be produced
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub role: Role,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialChecker,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(credentials: CredentialChecker, tokens: TokenService) -> Self {
        Self { credentials, tokens }
    }

    /// Build from configuration. Fails when the signing secret is missing.
    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        Ok(Self::new(
            CredentialChecker::from_config(config),
            TokenService::new(&config.secret)?,
        ))
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Check `password` against the secret of the requested role and issue a
    /// token on success.
    pub fn login(&self, password: Option<&str>, as_admin: bool) -> Result<LoginOutcome, AuthServiceError> {
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(AuthServiceError::MissingPassword)?;

        let role = if as_admin { Role::Admin } else { Role::Student };
        if !self.credentials.check_password(password, role) {
            return Err(AuthServiceError::InvalidPassword(role));
        }

        let token = self.tokens.issue(role)?;
        Ok(LoginOutcome { role, token })
    }

    pub fn validate_session(&self, token: &str) -> Option<SessionClaims> {
        self.tokens.verify(token)
    }
}
