//! Liveness probe, served outside the idle gate

use axum::response::Json;
use chrono::{DateTime, Utc};
use gnt_core::policy::IdlePolicy;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Idle budget the gate enforces, so operators can spot a mismatch with the shell
    pub idle_budget_secs: i64,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        idle_budget_secs: IdlePolicy::default().idle_budget_secs(),
        timestamp: Utc::now(),
    })
}
