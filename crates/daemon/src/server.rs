//! Server setup: the admin shell, auth routes and the idle gate in front

use crate::config::Settings;
use crate::routes::{login, shell};
use crate::{DaemonError, Result};
use axum::Router;
use axum::routing::get;
use gnt_core::clock::{Clock, SystemClock};
use gnt_http::routes::{auth, health};
use gnt_http::{GateState, JwtConfig, JwtService, JwtSessionOracle, idle_gate_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "your-secret-key-change-this-in-production";

/// Server configuration builder
pub struct ServerBuilder {
    settings: Settings,
    clock: Arc<dyn Clock>,
}

impl ServerBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock the gate reads
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the JWT service
    pub fn build_jwt_service(&self) -> Arc<JwtService> {
        let jwt = &self.settings.auth.jwt;
        let secret = jwt
            .secret
            .clone()
            .or_else(|| std::env::var("JWT_SECRET").ok())
            .unwrap_or_else(|| {
                warn!("No JWT secret configured, using the development default");
                DEV_JWT_SECRET.to_string()
            });
        let expiration_hours = i64::try_from(jwt.expiration_hours).unwrap_or(i64::MAX);

        Arc::new(JwtService::new(JwtConfig::new(
            secret,
            expiration_hours,
            jwt.issuer.clone(),
        )))
    }

    /// Build the gate state around a JWT oracle
    pub fn build_gate_state(&self, jwt: Arc<JwtService>) -> GateState {
        let policy = self.settings.to_gate_policy();
        let oracle = JwtSessionOracle::new(jwt, policy.session_cookies.clone());
        GateState::new(policy, Arc::new(oracle), self.clock.clone())
    }

    /// Assemble the full router with the gate and request tracing applied
    pub fn build_router(&self) -> Router {
        let gate = self.build_gate_state(self.build_jwt_service());

        let mut router = shell::router()
            .route("/login", get(login::login_page))
            .route("/health", get(health::health_check))
            .merge(auth::router(gate.policy.clone()));

        if let Some(dir) = &self.settings.server.static_dir {
            info!("Serving static assets from {}", dir.display());
            router = router.nest_service("/assets", ServeDir::new(dir));
        }

        router
            .layer(axum::middleware::from_fn_with_state(
                gate,
                idle_gate_middleware,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound
    pub async fn serve(self) -> Result<()> {
        let addr = self.settings.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(DaemonError::Io)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
