//! Routes in the public auth namespace

use crate::config::GatePolicy;
use crate::middleware::idle_gate::{force_sign_out, is_secure};
use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use std::sync::Arc;

pub const SIGN_OUT_PATH: &str = "/api/auth/signout";

/// Router for the sign-out endpoint. Lives under `/api/auth`, which the idle
/// gate lets through untouched.
pub fn router(policy: Arc<GatePolicy>) -> Router {
    Router::new()
        .route(SIGN_OUT_PATH, post(sign_out))
        .with_state(policy)
}

/// Revoke the session on this device by expiring every credential cookie
/// and the activity marker. Always succeeds.
pub async fn sign_out(State(policy): State<Arc<GatePolicy>>, req: Request) -> Response {
    let secure = is_secure(&policy, &req);
    let mut response = StatusCode::NO_CONTENT.into_response();
    force_sign_out(response.headers_mut(), &policy, secure);
    info!("Session signed out");
    response
}
