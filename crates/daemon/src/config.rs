//! Configuration management for the GNT daemon
//!
//! Sources are layered: built-in defaults, then an optional TOML/YAML file,
//! then `GNT__SECTION__KEY` environment variables.

use crate::Result;
use config::{Config, Environment, File};
use gnt_http::config::{
    DEFAULT_CLOCK_SKEW_TOLERANCE_MS, DEFAULT_CSRF_COOKIES, DEFAULT_SESSION_COOKIES, GatePolicy,
    RoleRestrictions,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level daemon settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Mark cookies `Secure` even for plain-HTTP hops behind a TLS proxy
    #[serde(default)]
    pub assume_https: bool,
    /// Directory served under `/assets` (the compiled browser shell)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assume_https: false,
            static_dir: None,
        }
    }
}

/// Session token validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt: JwtSettings,
    /// Cookies carrying the session token; read by the oracle, cleared on sign-out
    #[serde(default = "default_session_cookies")]
    pub session_cookie_names: Vec<String>,
    /// Cleared on sign-out only
    #[serde(default = "default_csrf_cookies")]
    pub csrf_cookie_names: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtSettings::default(),
            session_cookie_names: default_session_cookies(),
            csrf_cookie_names: default_csrf_cookies(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// Shared secret of the token issuer. Falls back to `JWT_SECRET`.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: default_issuer(),
            expiration_hours: default_expiration_hours(),
        }
    }
}

/// Edge gate tuning. The idle budget itself is fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Public prefixes added to the built-in sign-in and asset prefixes
    #[serde(default = "default_extra_public_prefixes")]
    pub extra_public_prefixes: Vec<String>,
    #[serde(default = "default_clock_skew_tolerance_ms")]
    pub clock_skew_tolerance_ms: i64,
    #[serde(default)]
    pub role_restrictions: RoleRestrictions,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            extra_public_prefixes: default_extra_public_prefixes(),
            clock_skew_tolerance_ms: default_clock_skew_tolerance_ms(),
            role_restrictions: RoleRestrictions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_cookies() -> Vec<String> {
    DEFAULT_SESSION_COOKIES.iter().map(|s| (*s).to_string()).collect()
}

fn default_csrf_cookies() -> Vec<String> {
    DEFAULT_CSRF_COOKIES.iter().map(|s| (*s).to_string()).collect()
}

fn default_issuer() -> String {
    "gnt-admin".to_string()
}

fn default_expiration_hours() -> u64 {
    24
}

fn default_extra_public_prefixes() -> Vec<String> {
    vec!["/assets".to_string(), "/health".to_string()]
}

fn default_clock_skew_tolerance_ms() -> i64 {
    DEFAULT_CLOCK_SKEW_TOLERANCE_MS
}

fn default_log_level() -> String {
    "info,gnt_http=debug".to_string()
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong type
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("GNT")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.gate.clock_skew_tolerance_ms < 0 {
            return Err(crate::DaemonError::InvalidConfig(
                "gate.clock_skew_tolerance_ms must not be negative".to_string(),
            ));
        }
        if self.auth.session_cookie_names.is_empty() {
            return Err(crate::DaemonError::InvalidConfig(
                "auth.session_cookie_names must name at least one cookie".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address the server binds to
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form an address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                crate::DaemonError::InvalidConfig(format!(
                    "Invalid bind address {}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }

    /// Override host and port, e.g. from the command line
    pub fn set_bind_addr(&mut self, addr: SocketAddr) {
        self.server.host = addr.ip().to_string();
        self.server.port = addr.port();
    }

    /// Gate policy derived from these settings
    pub fn to_gate_policy(&self) -> GatePolicy {
        let mut policy = GatePolicy {
            session_cookies: self.auth.session_cookie_names.clone(),
            csrf_cookies: self.auth.csrf_cookie_names.clone(),
            clock_skew_tolerance_ms: self.gate.clock_skew_tolerance_ms,
            assume_https: self.server.assume_https,
            ..GatePolicy::default()
        }
        .with_role_restrictions(self.gate.role_restrictions.clone());

        for prefix in &self.gate.extra_public_prefixes {
            policy = policy.with_public_prefix(prefix.clone());
        }
        policy
    }
}
