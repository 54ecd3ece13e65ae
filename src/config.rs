//! # Webhook Configuration
//!
//! Process-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_METRICS_PORT, DEFAULT_WEBHOOK_CERT_PATH, DEFAULT_WEBHOOK_KEY_PATH,
    DEFAULT_WEBHOOK_PORT,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected 'text' or 'json')")),
        }
    }
}

/// Webhook process configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// Environment variables are populated from a ConfigMap using `envFrom` in the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// HTTPS port for admission reviews
    pub webhook_port: u16,
    /// TLS certificate (PEM) mounted from the webhook serving-cert secret
    pub cert_path: PathBuf,
    /// TLS private key (PEM) mounted from the webhook serving-cert secret
    pub key_path: PathBuf,
    /// Plain HTTP port for `/metrics`, `/healthz` and `/readyz`
    pub metrics_port: u16,
    /// Log format (json, text)
    pub log_format: LogFormat,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_port: DEFAULT_WEBHOOK_PORT,
            cert_path: PathBuf::from(DEFAULT_WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(DEFAULT_WEBHOOK_KEY_PATH),
            metrics_port: DEFAULT_METRICS_PORT,
            log_format: LogFormat::Text,
        }
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            webhook_port: parse_or(&lookup, "WEBHOOK_PORT", defaults.webhook_port),
            cert_path: lookup("WEBHOOK_CERT_PATH").map_or(defaults.cert_path, PathBuf::from),
            key_path: lookup("WEBHOOK_KEY_PATH").map_or(defaults.key_path, PathBuf::from),
            metrics_port: parse_or(&lookup, "METRICS_PORT", defaults.metrics_port),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format),
        }
    }

    /// Socket address the webhook binds to
    pub fn webhook_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.webhook_port))
    }

    /// Socket address the metrics/probe server binds to
    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.metrics_port))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
