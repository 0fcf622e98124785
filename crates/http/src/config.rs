//! Edge gate configuration

use gnt_core::policy::{IdlePolicy, LAST_ACTIVITY_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Path prefixes that bypass the gate: the sign-in flow, the auth callback
/// namespace and static assets.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
    "/api/auth",
    "/_next",
    "/favicon.ico",
];

/// Cookies carrying the session credential
pub const DEFAULT_SESSION_COOKIES: &[&str] = &[
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
];

/// Cookies cleared alongside the credential on forced sign-out
pub const DEFAULT_CSRF_COOKIES: &[&str] = &["next-auth.csrf-token", "__Host-next-auth.csrf-token"];

/// How far a marker may sit in the future before it is distrusted
pub const DEFAULT_CLOCK_SKEW_TOLERANCE_MS: i64 = 5_000;

/// Role → path prefixes that role may not open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRestrictions(pub HashMap<String, Vec<String>>);

impl RoleRestrictions {
    /// Whether `role` is barred from `path`
    pub fn is_barred(&self, role: Option<&str>, path: &str) -> bool {
        role.and_then(|role| self.0.get(role))
            .is_some_and(|prefixes| prefixes.iter().any(|prefix| path.starts_with(prefix.as_str())))
    }
}

impl Default for RoleRestrictions {
    /// Plain admins are kept out of billing and subscriber management;
    /// super-admins are unrestricted.
    fn default() -> Self {
        let admin = ["/payment-details", "/plan", "/subscriber"]
            .into_iter()
            .map(str::to_string)
            .collect();
        Self(HashMap::from([("admin".to_string(), admin)]))
    }
}

/// Everything the idle gate needs to decide a request
#[derive(Debug, Clone)]
pub struct GatePolicy {
    /// Shared with the client monitor; not configurable on its own
    pub idle: IdlePolicy,
    pub marker_cookie: String,
    pub public_prefixes: Vec<String>,
    pub session_cookies: Vec<String>,
    pub csrf_cookies: Vec<String>,
    pub clock_skew_tolerance_ms: i64,
    pub role_restrictions: RoleRestrictions,
    /// Treat every request as HTTPS (TLS terminated upstream)
    pub assume_https: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            idle: IdlePolicy::default(),
            marker_cookie: LAST_ACTIVITY_KEY.to_string(),
            public_prefixes: to_strings(DEFAULT_PUBLIC_PREFIXES),
            session_cookies: to_strings(DEFAULT_SESSION_COOKIES),
            csrf_cookies: to_strings(DEFAULT_CSRF_COOKIES),
            clock_skew_tolerance_ms: DEFAULT_CLOCK_SKEW_TOLERANCE_MS,
            role_restrictions: RoleRestrictions::default(),
            assume_https: false,
        }
    }
}

impl GatePolicy {
    /// Add a public prefix on top of the defaults
    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefixes.push(prefix.into());
        self
    }

    #[must_use]
    pub fn with_role_restrictions(mut self, restrictions: RoleRestrictions) -> Self {
        self.role_restrictions = restrictions;
        self
    }

    /// Plain prefix match, as the sign-in flow expects: `/login` also covers
    /// `/login/anything` and `/loginhelp`.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Every cookie a forced sign-out must expire
    pub fn cookies_to_clear(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.marker_cookie.as_str())
            .chain(self.session_cookies.iter().map(String::as_str))
            .chain(self.csrf_cookies.iter().map(String::as_str))
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
