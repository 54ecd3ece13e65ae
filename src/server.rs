//! # Probe Server
//!
//! Plain HTTP listener next to the TLS webhook, serving:
//! - `/metrics` - the crate's Prometheus registry
//! - `/healthz` - liveness, 200 while the process runs
//! - `/readyz` - readiness, 200 only while the webhook accepts admission reviews
//!
//! Readiness is driven by the flag [`crate::admission::run_webhook_server`]
//! flips, so a pod whose certificate failed to load never turns ready.

use crate::constants::{HEALTHZ_PATH, METRICS_PATH, READYZ_PATH};
use crate::observability::metrics;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Readiness shared between the webhook server and the probes
#[derive(Debug, Clone, Default)]
pub struct ProbeState {
    webhook_ready: Arc<AtomicBool>,
}

impl ProbeState {
    /// Flag handed to the webhook server; `true` while it serves TLS
    pub fn webhook_ready(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.webhook_ready)
    }

    fn is_ready(&self) -> bool {
        self.webhook_ready.load(Ordering::Relaxed)
    }
}

/// Errors that stop the probe server
#[derive(Debug, Error)]
pub enum ProbeServerError {
    #[error("failed to bind probe server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("probe server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the metrics/probe router
pub fn create_probe_router(state: ProbeState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics_handler))
        .route(HEALTHZ_PATH, get(|| async { StatusCode::OK }))
        .route(READYZ_PATH, get(readyz_handler))
        .with_state(state)
}

/// Serve probes on `addr` until the listener fails
pub async fn run_probe_server(addr: SocketAddr, state: ProbeState) -> Result<(), ProbeServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ProbeServerError::Bind { addr, source })?;
    info!(addr = %addr, "Probe server listening");

    axum::serve(listener, create_probe_router(state))
        .await
        .map_err(ProbeServerError::Serve)
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::encode_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, metrics::TEXT_CONTENT_TYPE)],
            body,
        ),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {e}").into_bytes(),
            )
        }
    }
}

async fn readyz_handler(State(state): State<ProbeState>) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "webhook serving")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "webhook not serving")
    }
}
