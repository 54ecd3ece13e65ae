//! # Credentials Secret Validation
//!
//! Checks that a Secret carries a well-formed Alibaba Cloud access key pair.
//! Only the shape is checked; the keys are never used against the cloud API.

use super::{ACCESS_KEY_ID, ACCESS_KEY_ID_MIN_LEN, ACCESS_KEY_SECRET, ACCESS_KEY_SECRET_MIN_LEN};
use k8s_openapi::api::core::v1::Secret;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Reasons a credentials Secret is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("missing \"{field}\" field in secret {secret}")]
    MissingField { field: &'static str, secret: String },

    #[error("field \"{field}\" in secret {secret} cannot be empty")]
    EmptyField { field: &'static str, secret: String },

    #[error("field \"{field}\" in secret {secret} must be at least {min_len} characters long")]
    TooShort {
        field: &'static str,
        secret: String,
        min_len: usize,
    },

    #[error("field \"{field}\" in secret {secret} must not contain leading or trailing whitespace")]
    Whitespace { field: &'static str, secret: String },

    #[error("field \"{field}\" in secret {secret} is not valid UTF-8")]
    InvalidEncoding { field: &'static str, secret: String },
}

impl CredentialsError {
    /// Secret data key the error is about
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::EmptyField { field, .. }
            | Self::TooShort { field, .. }
            | Self::Whitespace { field, .. }
            | Self::InvalidEncoding { field, .. } => field,
        }
    }
}

/// Access key pair read from a credentials Secret.
///
/// Key material is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &mask(&self.access_key_id))
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate `secret` and read the access key pair out of it
    pub fn from_secret(secret: &Secret) -> Result<Self, CredentialsError> {
        validate_cloud_provider_secret(secret)?;
        Ok(Self {
            access_key_id: read_utf8(secret, ACCESS_KEY_ID)?,
            access_key_secret: read_utf8(secret, ACCESS_KEY_SECRET)?,
        })
    }

    /// Access key ID with everything but the first four characters masked
    pub fn masked_access_key_id(&self) -> String {
        mask(&self.access_key_id)
    }
}

/// Validate the Alibaba Cloud fields of a credentials Secret.
///
/// Fields are checked in order (`accessKeyID`, then `accessKeySecret`) and the
/// first violation is returned:
/// - the field must be present and non-empty
/// - it must reach the provider's minimum key length
/// - it must not start or end with whitespace, Unicode spaces included
pub fn validate_cloud_provider_secret(secret: &Secret) -> Result<(), CredentialsError> {
    let secret_key = secret_key(secret);

    for (field, min_len) in [
        (ACCESS_KEY_ID, ACCESS_KEY_ID_MIN_LEN),
        (ACCESS_KEY_SECRET, ACCESS_KEY_SECRET_MIN_LEN),
    ] {
        let Some(value) = field_bytes(secret, field) else {
            return Err(CredentialsError::MissingField {
                field,
                secret: secret_key,
            });
        };

        if value.is_empty() {
            return Err(CredentialsError::EmptyField {
                field,
                secret: secret_key,
            });
        }

        if value.len() < min_len {
            return Err(CredentialsError::TooShort {
                field,
                secret: secret_key,
                min_len,
            });
        }

        let text = String::from_utf8_lossy(value);
        if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
            return Err(CredentialsError::Whitespace {
                field,
                secret: secret_key,
            });
        }
    }

    Ok(())
}

fn field_bytes<'a>(secret: &'a Secret, field: &str) -> Option<&'a [u8]> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(field))
        .map(|value| value.0.as_slice())
}

fn read_utf8(secret: &Secret, field: &'static str) -> Result<String, CredentialsError> {
    let bytes = field_bytes(secret, field).unwrap_or_default();
    String::from_utf8(bytes.to_vec()).map_err(|_utf8_err| CredentialsError::InvalidEncoding {
        field,
        secret: secret_key(secret),
    })
}

fn secret_key(secret: &Secret) -> String {
    format!(
        "{}/{}",
        secret.metadata.namespace.as_deref().unwrap_or_default(),
        secret.metadata.name.as_deref().unwrap_or_default()
    )
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{visible}****")
}
