//! Gate HTTP module: the edge request gate and the auth routes around it
//!
//! The gate runs as axum middleware in front of every route. It asks a
//! [`SessionOracle`] whether the request carries a valid session, checks the
//! server-observable activity marker cookie against the shared idle budget,
//! and either lets the request through with a refreshed marker or forces a
//! sign-out redirect.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::{GatePolicy, RoleRestrictions};
pub use error::{HttpError, Result};
pub use middleware::{GateState, force_sign_out, idle_gate_middleware};
pub use services::{JwtConfig, JwtService, JwtSessionOracle, Session, SessionOracle};

// Re-export commonly used types
pub use axum::{Json, extract, response};
