//! # Metrics
//!
//! Prometheus metrics for monitoring the webhook.
//!
//! ## Metrics Exposed
//!
//! - `secretbinding_admission_decisions_total{result,reason}` - Admission decisions
//! - `secretbinding_admission_duration_seconds` - Time spent deciding a request
//! - `secretbinding_secret_fetches_total{result}` - Credentials Secret reads against the API server

use anyhow::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, OnceLock};

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static ADMISSION_DECISIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "secretbinding_admission_decisions_total",
            "Total number of SecretBinding admission decisions",
        ),
        &["result", "reason"],
    )
    .expect("Failed to create ADMISSION_DECISIONS_TOTAL metric - this should never happen")
});

static ADMISSION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "secretbinding_admission_duration_seconds",
            "Duration of SecretBinding admission decisions in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .expect("Failed to create ADMISSION_DURATION metric - this should never happen")
});

static SECRET_FETCHES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "secretbinding_secret_fetches_total",
            "Total number of credentials Secret reads",
        ),
        &["result"],
    )
    .expect("Failed to create SECRET_FETCHES_TOTAL metric - this should never happen")
});

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register all metrics with the crate registry.
///
/// Only the first call registers. Every later call returns the outcome of
/// that first attempt, so a failed registration keeps failing.
pub fn register_metrics() -> Result<()> {
    first_outcome(&REGISTERED, register_all)
}

fn first_outcome(
    cell: &OnceLock<Result<(), String>>,
    register: impl FnOnce() -> Result<()>,
) -> Result<()> {
    cell.get_or_init(|| register().map_err(|e| format!("{e:#}")))
        .clone()
        .map_err(|e| anyhow::anyhow!("metrics registration failed: {e}"))
}

fn register_all() -> Result<()> {
    REGISTRY.register(Box::new(ADMISSION_DECISIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ADMISSION_DURATION.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCHES_TOTAL.clone()))?;
    Ok(())
}

pub fn record_admission_decision(result: &str, reason: &str, duration: f64) {
    ADMISSION_DECISIONS_TOTAL
        .with_label_values(&[result, reason])
        .inc();
    ADMISSION_DURATION.observe(duration);
}

pub fn record_secret_fetch(result: &str) {
    SECRET_FETCHES_TOTAL.with_label_values(&[result]).inc();
}

/// Content type of [`encode_text`] output
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Gather the registry in the Prometheus text exposition format
pub fn encode_text() -> Result<Vec<u8>, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(buffer)
}

/// Current value of the decision counter for `result`/`reason`
pub fn admission_decisions(result: &str, reason: &str) -> u64 {
    ADMISSION_DECISIONS_TOTAL
        .with_label_values(&[result, reason])
        .get()
}
