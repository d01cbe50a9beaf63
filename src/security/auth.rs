use crate::config::SecurityConfig;
use crate::error::Error;
use crate::security::{SecurityService, Session, SessionStore};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Message shown on the login form after a rejected attempt
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login form fields. Absent fields arrive empty and simply fail the check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// A freshly established session and the token that refers to it
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub session: Session,
    pub token: String,
}

/// Authentication service for the single operator account
pub struct AuthService {
    security: SecurityService,
    sessions: SessionStore,
    config: SecurityConfig,
}

impl AuthService {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            security: SecurityService::new(config),
            sessions: SessionStore::new(),
            config: config.clone(),
        }
    }

    /// Plain comparison against the configured pair
    pub fn verify_credentials(&self, credentials: &LoginCredentials) -> bool {
        credentials.username == self.config.admin_username
            && credentials.password == self.config.admin_password
    }

    /// Check credentials and, on a match, open a session
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken> {
        if !self.verify_credentials(credentials) {
            warn!("Rejected login attempt for user: {}", credentials.username);
            return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()).into());
        }

        let session = self.sessions.create().await;
        let token = match self.security.generate_token(&session) {
            Ok(token) => token,
            Err(e) => {
                self.sessions.revoke(&session.id).await;
                return Err(e);
            }
        };

        info!("User logged in: {}", credentials.username);

        Ok(AuthToken { session, token })
    }

    /// End the session behind `token`, if there is one. Always succeeds.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(token) = token else {
            debug!("Logout without a session cookie");
            return;
        };

        match self
            .security
            .validate_token(token)
            .ok()
            .and_then(|claims| claims.session_id().ok())
        {
            Some(id) => {
                if self.sessions.revoke(&id).await {
                    info!("Session {} logged out", id);
                }
            }
            None => debug!("Logout with an unreadable session cookie"),
        }
    }

    /// Map a cookie token to a live, logged-in session
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let claims = match self.security.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("{}", e);
                return None;
            }
        };

        if !claims.logged_in {
            return None;
        }

        let id = claims.session_id().ok()?;
        self.sessions.get(&id).await.filter(|session| session.logged_in)
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn secure_cookie(&self) -> bool {
        self.config.secure_cookie
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
