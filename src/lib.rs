//! SecretBinding Validator Library
//!
//! Validating admission webhook for Gardener `SecretBinding`s of the Alibaba
//! Cloud provider: before a binding is created, or re-pointed at `alicloud`,
//! the referenced Secret must hold a well-formed access key pair.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use secretbinding_validator::admission::{KubeSecretReader, SecretBindingValidator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = kube::Client::try_default().await?;
//! let validator = SecretBindingValidator::new(KubeSecretReader::new(client));
//! # let _ = validator;
//! # Ok(())
//! # }
//! ```

pub mod admission;
pub mod cli;
pub mod config;
pub mod constants;
pub mod crd;
pub mod observability;
pub mod provider;
pub mod server;
