//! # SecretBinding Validator
//!
//! Validating admission webhook for Gardener SecretBindings of the Alibaba Cloud
//! provider.
//!
//! ## Overview
//!
//! On CREATE, and on UPDATE when the provider type changes, the webhook:
//!
//! 1. **Reads the referenced Secret** - directly from the API server, no cache
//! 2. **Checks the access keys** - `accessKeyID` and `accessKeySecret` must be present and well-formed
//! 3. **Answers the AdmissionReview** - denials carry the reason and the offending field
//!
//! A plain HTTP server exposes Prometheus metrics and health probes next to the
//! TLS webhook endpoint.

use anyhow::{Context, Result};
use clap::Parser;
use secretbinding_validator::admission::{
    run_webhook_server, KubeSecretReader, SecretBindingValidator, Validator,
};
use secretbinding_validator::cli::{check_secret_file, Cli, Command};
use secretbinding_validator::config::WebhookConfig;
use secretbinding_validator::observability::{self, metrics};
use secretbinding_validator::server::{run_probe_server, ProbeState};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::CheckSecret { file } => check_secret(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn check_secret(file: &Path) -> Result<()> {
    let creds = check_secret_file(file)?;
    println!(
        "{}: valid Alibaba Cloud credentials (accessKeyID {})",
        file.display(),
        creds.masked_access_key_id()
    );
    Ok(())
}

async fn serve() -> Result<()> {
    let config = WebhookConfig::from_env();
    observability::init_tracing(config.log_format)?;

    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_already_installed| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    info!("Starting SecretBinding validator v{}", env!("CARGO_PKG_VERSION"));
    metrics::register_metrics().context("Failed to register metrics")?;

    let client = kube::Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    let validator: Arc<dyn Validator> =
        Arc::new(SecretBindingValidator::new(KubeSecretReader::new(client)));

    let probes = ProbeState::default();
    let metrics_addr = config.metrics_addr();
    let probe_server = tokio::spawn({
        let probes = probes.clone();
        async move {
            if let Err(e) = run_probe_server(metrics_addr, probes).await {
                error!(error = %e, "Probe server failed");
            }
        }
    });

    let webhook = run_webhook_server(
        config.webhook_addr(),
        &config.cert_path,
        &config.key_path,
        validator,
        probes.webhook_ready(),
    );

    let outcome = tokio::select! {
        res = webhook => res.context("Webhook server stopped"),
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            Ok(())
        }
    };

    probe_server.abort();
    outcome
}
