//! # Admission Errors
//!
//! Every rejection the validator can produce. The webhook turns these into
//! denied admission responses; nothing here is retried.

use crate::provider::alicloud::CredentialsError;
use kube::core::DynamicObject;
use std::fmt;
use thiserror::Error;

/// Observed type of an admission object, rendered as `<apiVersion>, Kind=<kind>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub api_version: String,
    pub kind: String,
}

impl ObjectType {
    /// Type of `obj`, empty when the object carries no type information
    pub fn of(obj: &DynamicObject) -> Self {
        obj.types.as_ref().map_or_else(
            || Self {
                api_version: String::new(),
                kind: String::new(),
            },
            |types| Self {
                api_version: types.api_version.clone(),
                kind: types.kind.clone(),
            },
        )
    }

    /// API group part of `api_version` (empty for the core group)
    pub fn group(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map_or("", |(group, _version)| group)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            return f.write_str("<unknown>");
        }
        write!(f, "{}, Kind={}", self.api_version, self.kind)
    }
}

/// Why a SecretBinding admission request is rejected
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The new object is not a SecretBinding
    #[error("wrong object type {actual}")]
    WrongObjectType { actual: ObjectType },

    /// The old object of an UPDATE is not a SecretBinding
    #[error("wrong object type {actual} for old object")]
    WrongOldObjectType { actual: ObjectType },

    /// The object claims to be a SecretBinding but its body does not decode
    #[error("failed to decode SecretBinding: {0}")]
    Decode(#[from] serde_json::Error),

    /// The old object of an UPDATE claims to be a SecretBinding but does not decode
    #[error("failed to decode SecretBinding for old object: {0}")]
    DecodeOld(#[source] serde_json::Error),

    /// The credentials Secret could not be read; the reader's error is kept as-is
    #[error(transparent)]
    Fetch(anyhow::Error),

    /// The credentials Secret is malformed
    #[error(transparent)]
    InvalidCredentials(#[from] CredentialsError),
}

impl ValidationError {
    /// Short machine-readable reason, used as the denial reason
    pub fn reason(&self) -> &'static str {
        match self {
            Self::WrongObjectType { .. } => "WrongObjectType",
            Self::WrongOldObjectType { .. } => "WrongOldObjectType",
            Self::Decode(_) => "DecodeFailed",
            Self::DecodeOld(_) => "DecodeOldFailed",
            Self::Fetch(_) => "SecretFetchFailed",
            Self::InvalidCredentials(_) => "InvalidCredentials",
        }
    }

    /// Whether the error concerns the old object of an UPDATE
    pub fn is_old_object(&self) -> bool {
        matches!(self, Self::WrongOldObjectType { .. } | Self::DecodeOld(_))
    }
}
