use crate::config::SecurityConfig;
use crate::error::Error;
use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth;
pub mod session_store;

pub use session_store::{Session, SessionStore};

/// Claims carried by the session cookie.
///
/// The token only names a session; whether that session is still logged in is
/// decided by the [`SessionStore`]. There is no `exp`: sessions last until
/// logout or until the store is reset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// Session ID
    pub sid: String,
    /// Session marker
    pub logged_in: bool,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl SessionClaims {
    pub fn session_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sid)
    }
}

/// Signs and checks session tokens with the configured secret
#[derive(Clone)]
pub struct SecurityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SecurityService {
    pub fn new(config: &SecurityConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `session`
    pub fn generate_token(&self, session: &Session) -> Result<String> {
        let claims = SessionClaims {
            sid: session.id.to_string(),
            logged_in: session.logged_in,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::Session(format!("Failed to sign session token: {}", e)))?;

        Ok(token)
    }

    /// Check the signature and decode the claims
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| Error::Session(format!("Invalid session token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> SecurityService {
        SecurityService::new(&SecurityConfig {
            secret_key: secret.to_string(),
            ..SecurityConfig::default()
        })
    }

    #[test]
    fn test_token_roundtrip() {
        let security = service("secret-a");
        let session = Session::authenticated();

        let token = security.generate_token(&session).unwrap();
        let claims = security.validate_token(&token).unwrap();

        assert_eq!(claims.session_id().unwrap(), session.id);
        assert!(claims.logged_in);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service("secret-a")
            .generate_token(&Session::authenticated())
            .unwrap();
        assert!(service("secret-b").validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service("secret-a").validate_token("not.a.token").is_err());
        assert!(service("secret-a").validate_token("").is_err());
    }
}
