//! Edge request gate: session presence, server-side idle expiry and the
//! role post-check, applied before any page handler runs.

use crate::config::GatePolicy;
use crate::cookies::{activity_cookie, clearing_cookie, request_cookie};
use crate::services::oracle::{Session, SessionOracle};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, uri::Scheme};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use gnt_core::clock::Clock;
use gnt_core::marker::parse_marker;
use gnt_core::policy::SIGN_IN_PATH;
use std::sync::Arc;
use url::form_urlencoded;

/// Shared state of the gate layer. Holds no per-request data.
#[derive(Clone)]
pub struct GateState {
    pub policy: Arc<GatePolicy>,
    pub oracle: Arc<dyn SessionOracle>,
    pub clock: Arc<dyn Clock>,
}

impl GateState {
    pub fn new(policy: GatePolicy, oracle: Arc<dyn SessionOracle>, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy: Arc::new(policy),
            oracle,
            clock,
        }
    }
}

/// What the oracle said about the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Valid(Session),
    Missing,
    /// The oracle failed to answer
    Unavailable,
}

/// Request data the decision depends on
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub path: &'a str,
    pub marker: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInRedirect {
    Unauthenticated { callback: String },
    Inactive,
}

impl SignInRedirect {
    pub fn location(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self {
            Self::Unauthenticated { callback } => query.append_pair("callbackUrl", callback),
            Self::Inactive => query.append_pair("reason", "inactive"),
        };
        format!("{SIGN_IN_PATH}?{}", query.finish())
    }
}

/// Decision for a non-public request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Pass through and refresh the activity marker
    Allow(Session),
    /// Role may not open this path; send home, marker still refreshed
    RedirectHome(Session),
    /// Force sign-out and redirect to the sign-in page
    SignIn(SignInRedirect),
}

/// Decide a non-public request. Public prefixes are handled before the
/// oracle is consulted and never reach this function.
pub fn evaluate(
    policy: &GatePolicy,
    input: &GateInput<'_>,
    lookup: SessionLookup,
    now_ms: i64,
) -> GateOutcome {
    let session = match lookup {
        SessionLookup::Valid(session) => session,
        SessionLookup::Missing | SessionLookup::Unavailable => {
            return GateOutcome::SignIn(SignInRedirect::Unauthenticated {
                callback: input.path.to_string(),
            });
        }
    };

    let stale = trusted_marker(policy, input.marker, now_ms)
        .is_some_and(|marker| policy.idle.is_exceeded(now_ms.saturating_sub(marker)));
    if stale {
        return GateOutcome::SignIn(SignInRedirect::Inactive);
    }

    if input.path != "/"
        && policy
            .role_restrictions
            .is_barred(session.role.as_deref(), input.path)
    {
        return GateOutcome::RedirectHome(session);
    }

    GateOutcome::Allow(session)
}

/// Marker timestamp usable for the staleness check. Missing, malformed and
/// future-dated markers all count as "not yet stale".
fn trusted_marker(policy: &GatePolicy, raw: Option<&str>, now_ms: i64) -> Option<i64> {
    let raw = raw?;
    let Some(marker) = parse_marker(raw) else {
        warn!("Ignoring malformed activity marker {:?}", raw);
        return None;
    };
    let ahead_ms = marker.saturating_sub(now_ms);
    if ahead_ms > policy.clock_skew_tolerance_ms {
        warn!("Ignoring activity marker {}ms in the future", ahead_ms);
        return None;
    }
    Some(marker)
}

/// Expire the activity marker and every credential cookie.
///
/// Used by both sign-in redirect branches and by the sign-out route.
pub fn force_sign_out(headers: &mut HeaderMap, policy: &GatePolicy, secure: bool) {
    for name in policy.cookies_to_clear() {
        clearing_cookie(name, secure).append_to(headers);
    }
}

fn refresh_marker(headers: &mut HeaderMap, policy: &GatePolicy, now_ms: i64, secure: bool) {
    activity_cookie(
        &policy.marker_cookie,
        now_ms,
        policy.idle.idle_budget_secs(),
        secure,
    )
    .append_to(headers);
}

/// Whether the client reached us over HTTPS
pub fn is_secure<B>(policy: &GatePolicy, req: &axum::http::Request<B>) -> bool {
    policy.assume_https
        || req.uri().scheme() == Some(&Scheme::HTTPS)
        || req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Axum middleware running the gate in front of every route
#[tracing::instrument(name = "http.idle_gate", skip_all, fields(path = %req.uri().path()))]
pub async fn idle_gate_middleware(
    State(gate): State<GateState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if gate.policy.is_public(&path) {
        return next.run(req).await;
    }

    let secure = is_secure(&gate.policy, &req);
    let (mut parts, body) = req.into_parts();

    let lookup = match gate.oracle.resolve(&parts).await {
        Ok(Some(session)) => SessionLookup::Valid(session),
        Ok(None) => SessionLookup::Missing,
        Err(e) => {
            warn!("Session oracle failed, treating request as signed out: {}", e);
            SessionLookup::Unavailable
        }
    };

    let now_ms = gate.clock.now_ms();
    let marker = request_cookie(&parts.headers, &gate.policy.marker_cookie);
    let outcome = evaluate(
        &gate.policy,
        &GateInput {
            path: &path,
            marker,
        },
        lookup,
        now_ms,
    );

    match outcome {
        GateOutcome::Allow(session) => {
            debug!("Allowing request for {}", session.subject);
            parts.extensions.insert(session);
            let mut response = next.run(Request::from_parts(parts, body)).await;
            refresh_marker(response.headers_mut(), &gate.policy, now_ms, secure);
            response
        }
        GateOutcome::RedirectHome(session) => {
            info!(
                "Role {:?} may not open {}, redirecting home",
                session.role, path
            );
            let mut response = Redirect::temporary("/").into_response();
            refresh_marker(response.headers_mut(), &gate.policy, now_ms, secure);
            response
        }
        GateOutcome::SignIn(redirect) => {
            info!("Forcing sign-out: {:?}", redirect);
            let mut response = Redirect::temporary(&redirect.location()).into_response();
            force_sign_out(response.headers_mut(), &gate.policy, secure);
            response
        }
    }
}
