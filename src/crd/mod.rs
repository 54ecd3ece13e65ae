//! # Resource Types
//!
//! Typed views of the Gardener resources this webhook admits.
//!
//! - `SecretBinding` (`core.gardener.cloud/v1beta1`): links a namespaced
//!   credentials Secret to a declared cloud provider type.

mod secret_binding;

pub use secret_binding::{SecretBinding, SecretBindingProvider, SecretBindingSecretRef};
