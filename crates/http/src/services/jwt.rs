//! Session tokens minted by the identity provider
//!
//! The gate only needs to know who is signed in and with which role, so
//! verification yields a [`Session`] rather than raw claims.

use crate::error::HttpError;
use crate::services::oracle::Session;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Role used by the path restriction post-check
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Lifetime of tokens minted by [`JwtService::issue`]
    pub lifetime: Duration,
    /// Expected `iss` claim
    pub issuer: String,
}

impl JwtConfig {
    /// Oversized lifetimes are capped rather than rejected
    pub fn new(secret: String, lifetime_hours: i64, issuer: String) -> Self {
        Self {
            secret,
            lifetime: Duration::try_hours(lifetime_hours).unwrap_or(Duration::MAX),
            issuer,
        }
    }
}

/// Verifies session tokens, and mints them for tooling and tests
pub struct JwtService {
    issuer: String,
    lifetime: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(std::slice::from_ref(&config.issuer));

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            lifetime: config.lifetime,
        }
    }

    /// Check signature, issuer and expiry and return the session they vouch for
    pub fn verify(&self, token: &str) -> Result<Session, HttpError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| Session::from(data.claims))
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "session token has expired".to_string(),
                    ErrorKind::InvalidIssuer => "session token from another issuer".to_string(),
                    ErrorKind::InvalidSignature => "session token signature mismatch".to_string(),
                    _ => format!("session token rejected: {e}"),
                };
                HttpError::AuthenticationFailed(reason)
            })
    }

    /// Mint a token for `session` valid for the configured lifetime
    pub fn issue(&self, session: &Session) -> Result<String, HttpError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(self.lifetime).unwrap_or(now);
        let claims = SessionClaims {
            sub: session.subject.clone(),
            name: session.name.clone(),
            role: session.role.clone(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| HttpError::InternalServerError(format!("Failed to mint session token: {e}")))
    }
}

/// Token part of an `Authorization: Bearer ...` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: &str) -> JwtService {
        JwtService::new(JwtConfig::new(secret.to_string(), 1, issuer.to_string()))
    }

    #[test]
    fn test_issued_token_verifies_to_same_session() {
        let jwt = service("test-secret", "gnt");
        let session = Session::new("user-9").with_name("Ada").with_role("admin");

        let token = jwt.issue(&session).unwrap();

        assert_eq!(jwt.verify(&token).unwrap(), session);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service("test-secret", "gnt");
        let past = (Utc::now() - Duration::hours(2)).timestamp();
        let claims = SessionClaims {
            sub: "user".to_string(),
            name: None,
            role: None,
            exp: past,
            iat: past,
            iss: "gnt".to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &jwt.encoding_key).unwrap();

        match jwt.verify(&token) {
            Err(HttpError::AuthenticationFailed(msg)) => assert!(msg.contains("expired")),
            other => panic!("Expected authentication failure, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_issuer_and_secret_are_rejected() {
        let jwt = service("test-secret", "gnt");
        let session = Session::new("user");

        let other_issuer = service("test-secret", "someone-else").issue(&session).unwrap();
        assert!(jwt.verify(&other_issuer).is_err());

        let other_secret = service("another-secret", "gnt").issue(&session).unwrap();
        assert!(jwt.verify(&other_secret).is_err());
    }

    #[test]
    fn test_token_without_role_has_none() {
        let jwt = service("test-secret", "gnt");
        let token = jwt.issue(&Session::new("viewer")).unwrap();

        let session = jwt.verify(&token).unwrap();
        assert_eq!(session.role, None);
        assert_eq!(session.name, None);
    }

    #[test]
    fn test_oversized_lifetime_is_capped() {
        let config = JwtConfig::new("s".to_string(), i64::MAX, "gnt".to_string());
        assert_eq!(config.lifetime, Duration::MAX);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
