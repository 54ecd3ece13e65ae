//! # Command Line
//!
//! `secretbinding-validator [serve]` runs the webhook;
//! `secretbinding-validator check-secret <FILE>` checks a Secret manifest offline
//! with the same rules the webhook applies.

use crate::provider::alicloud::Credentials;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "secretbinding-validator", version, about = "Admission webhook for Alibaba Cloud SecretBindings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the admission webhook (default)
    Serve,
    /// Validate the access keys in a Secret manifest (YAML or JSON)
    CheckSecret {
        /// Path to the Secret manifest
        file: PathBuf,
    },
}

/// Load a Secret manifest, folding `stringData` into `data` like the API server does
pub fn load_secret_manifest(path: &Path) -> Result<Secret> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut secret: Secret = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse Secret manifest {}", path.display()))?;

    if let Some(string_data) = secret.string_data.take() {
        let data = secret.data.get_or_insert_with(Default::default);
        for (key, value) in string_data {
            data.insert(key, ByteString(value.into_bytes()));
        }
    }

    Ok(secret)
}

/// Check the credentials in the Secret manifest at `path`
pub fn check_secret_file(path: &Path) -> Result<Credentials> {
    let secret = load_secret_manifest(path)?;
    Credentials::from_secret(&secret)
        .with_context(|| format!("Secret manifest {} is not valid", path.display()))
}
