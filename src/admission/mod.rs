//! # Admission
//!
//! Validating admission for Gardener SecretBindings.
//!
//! - `secret_binding`: the validation decision logic
//! - `reader`: read-only Secret access used by the validator
//! - `webhook`: HTTPS endpoint translating AdmissionReviews into validator calls
//! - `error`: rejection kinds

mod error;
mod reader;
mod secret_binding;
mod webhook;

pub use error::{ObjectType, ValidationError};
pub use reader::{KubeSecretReader, ObjectKey, SecretReader};
pub use secret_binding::{
    decode_secret_binding, is_secret_binding, requires_credentials_check, SecretBindingValidator,
    Validator,
};
pub use webhook::{create_webhook_router, run_webhook_server, WebhookError, WebhookState};

// Re-export kube-rs admission types for callers building reviews
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
