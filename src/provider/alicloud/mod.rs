//! # Alibaba Cloud
//!
//! Provider type tag and credential field names for Alibaba Cloud, plus the
//! syntactic checks applied to credentials Secrets.

mod credentials;

pub use credentials::{validate_cloud_provider_secret, Credentials, CredentialsError};

/// Provider type tag carried by SecretBindings owned by this webhook
pub const TYPE: &str = "alicloud";

/// Secret data key holding the access key ID
pub const ACCESS_KEY_ID: &str = "accessKeyID";

/// Secret data key holding the access key secret
pub const ACCESS_KEY_SECRET: &str = "accessKeySecret";

/// Minimum length of an access key ID
/// Reference: https://www.alibabacloud.com/help/en/ram/user-guide/create-an-accesskey-pair
pub const ACCESS_KEY_ID_MIN_LEN: usize = 16;

/// Minimum length of an access key secret
pub const ACCESS_KEY_SECRET_MIN_LEN: usize = 30;
