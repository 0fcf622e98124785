//! Route definitions shared by every deployment

pub mod auth;
pub mod health;

pub use auth::SIGN_OUT_PATH;
pub use health::{HealthResponse, health_check};
