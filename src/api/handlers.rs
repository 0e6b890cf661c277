//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::session::SessionSnapshot;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the first market resolution has landed.
    pub ready: Arc<std::sync::atomic::AtomicBool>,
    /// Category the session was started with.
    pub category: Arc<String>,
    /// Last fetched account balance, in dollars.
    pub balance: Arc<tokio::sync::RwLock<Option<Decimal>>>,
    /// Latest session snapshot.
    pub session: Arc<tokio::sync::RwLock<Option<SessionSnapshot>>>,
    /// Prometheus render handle, absent when the recorder is not installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state for the given category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            category: Arc::new(category.into()),
            balance: Arc::new(tokio::sync::RwLock::new(None)),
            session: Arc::new(tokio::sync::RwLock::new(None)),
            prometheus: None,
        }
    }

    /// Attach a prometheus render handle for the `/metrics` endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready
            .store(ready, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Publish the latest account balance.
    pub async fn set_balance(&self, balance: Decimal) {
        *self.balance.write().await = Some(balance);
    }

    /// Publish the latest session snapshot.
    pub async fn set_snapshot(&self, snapshot: SessionSnapshot) {
        *self.session.write().await = Some(snapshot);
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the first market resolution has landed.
    pub ready: bool,
    /// Category the session was started with.
    pub category: String,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Category the session was started with.
    pub category: String,
    /// Account balance in dollars, if fetched.
    pub balance: Option<String>,
    /// Latest session snapshot.
    pub session: Option<SessionSnapshot>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 once markets are loaded, 503 before.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();

    let response = ReadyResponse {
        ready: is_ready,
        category: state.category.as_ref().clone(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns session progress and balance.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let balance = state.balance.read().await;
    let session = state.session.read().await.clone();

    let status = if state.is_ready() { "running" } else { "loading" };

    Json(StatusResponse {
        status,
        category: state.category.as_ref().clone(),
        balance: balance.map(|b| b.to_string()),
        session,
    })
}

/// Prometheus metrics handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed\n".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new("nba");
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[tokio::test]
    async fn app_state_publishes_balance() {
        let state = AppState::new("nba");
        assert!(state.balance.read().await.is_none());

        state.set_balance(rust_decimal_macros::dec!(50)).await;
        assert_eq!(
            *state.balance.read().await,
            Some(rust_decimal_macros::dec!(50))
        );
    }
}
