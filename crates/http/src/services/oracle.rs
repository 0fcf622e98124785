//! Session token oracle: "is this request authenticated, and as whom"

use crate::cookies::request_cookie;
use crate::error::HttpError;
use crate::services::jwt::{JwtService, bearer_token};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use std::sync::Arc;

/// Identity claims of an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: None,
            role: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| HttpError::AuthenticationFailed("No active session".to_string()))
    }
}

/// External authentication subsystem consulted by the idle gate.
///
/// `Ok(None)` means "no valid session". `Err` means the oracle could not
/// answer; the gate treats that the same as no session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionOracle: Send + Sync {
    async fn resolve(&self, parts: &Parts) -> Result<Option<Session>, HttpError>;
}

/// Oracle validating a JWT carried in a session cookie or a bearer header
pub struct JwtSessionOracle {
    jwt: Arc<JwtService>,
    session_cookies: Vec<String>,
}

impl JwtSessionOracle {
    pub fn new(jwt: Arc<JwtService>, session_cookies: Vec<String>) -> Self {
        Self {
            jwt,
            session_cookies,
        }
    }

    fn token<'a>(&self, parts: &'a Parts) -> Option<&'a str> {
        self.session_cookies
            .iter()
            .find_map(|name| request_cookie(&parts.headers, name))
            .filter(|token| !token.is_empty())
            .or_else(|| {
                parts
                    .headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(bearer_token)
            })
    }
}

#[async_trait]
impl SessionOracle for JwtSessionOracle {
    async fn resolve(&self, parts: &Parts) -> Result<Option<Session>, HttpError> {
        let Some(token) = self.token(parts) else {
            return Ok(None);
        };

        match self.jwt.verify(token) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                debug!("Rejecting session token: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::jwt::JwtConfig;
    use axum::http::Request;

    fn oracle() -> (JwtSessionOracle, Arc<JwtService>) {
        let jwt = Arc::new(JwtService::new(JwtConfig::new(
            "oracle-secret".to_string(),
            1,
            "gnt".to_string(),
        )));
        let oracle = JwtSessionOracle::new(
            jwt.clone(),
            vec![
                "next-auth.session-token".to_string(),
                "__Secure-next-auth.session-token".to_string(),
            ],
        );
        (oracle, jwt)
    }

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_resolves_session_cookie() {
        let (oracle, jwt) = oracle();
        let token = jwt
            .issue(&Session::new("u-1").with_name("Ada").with_role("admin"))
            .unwrap();
        let parts = parts(
            Request::builder()
                .uri("/")
                .header("cookie", format!("__Secure-next-auth.session-token={token}")),
        );

        let session = oracle.resolve(&parts).await.unwrap().unwrap();
        assert_eq!(session.subject, "u-1");
        assert_eq!(session.name.as_deref(), Some("Ada"));
        assert_eq!(session.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_falls_back_to_bearer_header() {
        let (oracle, jwt) = oracle();
        let token = jwt.issue(&Session::new("u-2")).unwrap();
        let parts = parts(
            Request::builder()
                .uri("/")
                .header("authorization", format!("Bearer {token}")),
        );

        let session = oracle.resolve(&parts).await.unwrap().unwrap();
        assert_eq!(session.subject, "u-2");
    }

    #[tokio::test]
    async fn test_missing_or_invalid_token_is_no_session() {
        let (oracle, _) = oracle();

        let bare = parts(Request::builder().uri("/"));
        assert_eq!(oracle.resolve(&bare).await.unwrap(), None);

        let forged = parts(
            Request::builder()
                .uri("/")
                .header("cookie", "next-auth.session-token=not-a-jwt"),
        );
        assert_eq!(oracle.resolve(&forged).await.unwrap(), None);
    }
}
