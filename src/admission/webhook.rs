//! # Admission Webhook Server
//!
//! HTTPS endpoint the API server calls for SecretBinding CREATE/UPDATE requests.
//!
//! To enable the webhook:
//! 1. Issue a serving certificate (e.g. with cert-manager)
//! 2. Mount it at `WEBHOOK_CERT_PATH` / `WEBHOOK_KEY_PATH`
//! 3. Register a ValidatingWebhookConfiguration for `secretbindings` in
//!    `core.gardener.cloud` pointing at `/webhooks/validate/secretbinding`

use super::secret_binding::Validator;
use crate::constants::SECRET_BINDING_WEBHOOK_PATH;
use crate::observability::metrics;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use kube::core::DynamicObject;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared state for webhook handlers
pub struct WebhookState {
    validator: Arc<dyn Validator>,
}

impl std::fmt::Debug for WebhookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookState").finish_non_exhaustive()
    }
}

impl WebhookState {
    pub fn new(validator: Arc<dyn Validator>) -> Self {
        Self { validator }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason(
    request: &AdmissionRequest<DynamicObject>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    AdmissionResponse::from(request)
        .deny(format!("[{reason}] {message}"))
        .into_review()
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(SECRET_BINDING_WEBHOOK_PATH, post(validate_secret_binding))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn validate_secret_binding(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let start = Instant::now();

    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(AdmissionResponse::invalid(format!("Invalid AdmissionReview: {e}")).into_review()),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    // Only CREATE and UPDATE carry a binding worth checking
    if matches!(request.operation, Operation::Delete | Operation::Connect) {
        debug!(uid = %uid, operation = ?request.operation, "Admission request allowed without validation");
        metrics::record_admission_decision("allowed", "NotValidated", start.elapsed().as_secs_f64());
        return (
            StatusCode::OK,
            Json(AdmissionResponse::from(&request).into_review()),
        );
    }

    let Some(object) = request.object.as_ref() else {
        error!(uid = %uid, "Missing object in request");
        metrics::record_admission_decision("denied", "InvalidRequest", start.elapsed().as_secs_f64());
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, "Missing object in request", "InvalidRequest")),
        );
    };

    if let Err(e) = state
        .validator
        .validate(object, request.old_object.as_ref())
        .await
    {
        let reason = e.reason();
        warn!(uid = %uid, reason = %reason, error = %e, "Admission request denied");
        metrics::record_admission_decision("denied", reason, start.elapsed().as_secs_f64());
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &e.to_string(), reason)),
        );
    }

    info!(uid = %uid, "Admission request allowed");
    metrics::record_admission_decision("allowed", "Valid", start.elapsed().as_secs_f64());
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

/// Errors that can occur when running the webhook server
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[source] std::io::Error),

    #[error("Webhook server error: {0}")]
    Server(#[source] std::io::Error),
}

/// Run the webhook server with TLS
///
/// `ready` is flipped once the certificate is loaded and the listener is about
/// to accept connections; the readiness probe reports it.
pub async fn run_webhook_server(
    addr: SocketAddr,
    cert_path: &Path,
    key_path: &Path,
    validator: Arc<dyn Validator>,
    ready: Arc<AtomicBool>,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;

    let app = create_webhook_router(Arc::new(WebhookState::new(validator)));

    let config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(WebhookError::TlsConfig)?;

    info!(addr = %addr, path = SECRET_BINDING_WEBHOOK_PATH, "Webhook server listening with TLS");
    ready.store(true, Ordering::Relaxed);

    let served = axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await;
    ready.store(false, Ordering::Relaxed);
    served.map_err(WebhookError::Server)
}
