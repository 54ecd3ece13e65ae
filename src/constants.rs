//! # Constants
//!
//! Shared constants used throughout the webhook.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see [`crate::config`]).

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Default HTTPS port the admission webhook listens on
pub const DEFAULT_WEBHOOK_PORT: u16 = 9443;

/// Default path to the webhook TLS certificate (PEM)
pub const DEFAULT_WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";

/// Default path to the webhook TLS private key (PEM)
pub const DEFAULT_WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";

/// Path the API server posts SecretBinding admission reviews to
pub const SECRET_BINDING_WEBHOOK_PATH: &str = "/webhooks/validate/secretbinding";

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "secretbinding_validator=info";

/// Prometheus scrape path on the probe server
pub const METRICS_PATH: &str = "/metrics";

/// Liveness probe path
pub const HEALTHZ_PATH: &str = "/healthz";

/// Readiness probe path, healthy once the webhook serves TLS
pub const READYZ_PATH: &str = "/readyz";
