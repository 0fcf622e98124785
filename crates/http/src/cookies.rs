//! Reading request cookies and building `Set-Cookie` headers

use axum::http::{HeaderMap, HeaderValue, header};
use gnt_core::marker::format_marker;
use std::fmt;

/// Value of the first cookie called `name` across all `Cookie` headers
pub fn request_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// A `Set-Cookie` header scoped to the whole origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age_secs: i64,
    pub http_only: bool,
    pub same_site_lax: bool,
    pub secure: bool,
}

impl SetCookie {
    /// Append this cookie to `headers`. Names that cannot form a header value
    /// are skipped with a warning.
    pub fn append_to(&self, headers: &mut HeaderMap) {
        match HeaderValue::try_from(self.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Skipping invalid cookie {}: {}", self.name, e),
        }
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Path=/; Max-Age={}",
            self.name, self.value, self.max_age_secs
        )?;
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.same_site_lax {
            write!(f, "; SameSite=Lax")?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        Ok(())
    }
}

/// Fresh last-activity marker living exactly one idle budget
pub fn activity_cookie(name: &str, now_ms: i64, max_age_secs: i64, secure: bool) -> SetCookie {
    SetCookie {
        name: name.to_string(),
        value: format_marker(now_ms),
        max_age_secs,
        http_only: true,
        same_site_lax: true,
        secure,
    }
}

/// Expires `name` immediately
pub fn clearing_cookie(name: &str, secure: bool) -> SetCookie {
    SetCookie {
        name: name.to_string(),
        value: String::new(),
        max_age_secs: 0,
        http_only: false,
        same_site_lax: false,
        secure,
    }
}
