//! # SecretBinding Validator
//!
//! Admission-time check of SecretBindings owned by the Alibaba Cloud provider.
//!
//! Per request:
//! 1. the new object (and the old one, on UPDATE) must be a SecretBinding
//! 2. bindings of other provider types are accepted untouched
//! 3. if the provider type did not change on UPDATE, nothing is re-checked
//! 4. otherwise the referenced Secret is fetched and its access keys are validated
//!
//! The validator holds nothing but its reader, so one instance serves
//! concurrent requests.

use super::error::{ObjectType, ValidationError};
use super::reader::{ObjectKey, SecretReader};
use crate::crd::SecretBinding;
use crate::provider::alicloud;
use async_trait::async_trait;
use kube::core::{DynamicObject, Resource};
use tracing::{debug, info};

/// Admission validator for one resource kind
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate `new` (and `old`, on UPDATE). `Ok(())` admits the request.
    async fn validate(
        &self,
        new: &DynamicObject,
        old: Option<&DynamicObject>,
    ) -> Result<(), ValidationError>;
}

/// Validates Alibaba Cloud SecretBindings
#[derive(Debug, Clone)]
pub struct SecretBindingValidator<R> {
    reader: R,
}

impl<R: SecretReader> SecretBindingValidator<R> {
    /// Create a validator reading Secrets through `reader`
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reader the validator fetches Secrets with
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Validate already-decoded bindings
    pub async fn validate_binding(
        &self,
        binding: &SecretBinding,
        old: Option<&SecretBinding>,
    ) -> Result<(), ValidationError> {
        if binding.provider_type() != Some(alicloud::TYPE) {
            debug!(
                provider = ?binding.provider_type(),
                "SecretBinding is not owned by this provider, skipping"
            );
            return Ok(());
        }

        if !requires_credentials_check(binding, old) {
            debug!("Provider type unchanged, skipping credentials check");
            return Ok(());
        }

        let key = ObjectKey::new(binding.secret_namespace(), binding.secret_ref.name.as_str());
        info!(secret = %key, "Validating credentials referenced by SecretBinding");

        let secret = self
            .reader
            .get(&key)
            .await
            .map_err(ValidationError::Fetch)?;

        alicloud::validate_cloud_provider_secret(&secret)?;
        Ok(())
    }
}

#[async_trait]
impl<R: SecretReader> Validator for SecretBindingValidator<R> {
    async fn validate(
        &self,
        new: &DynamicObject,
        old: Option<&DynamicObject>,
    ) -> Result<(), ValidationError> {
        if !is_secret_binding(new) {
            return Err(ValidationError::WrongObjectType {
                actual: ObjectType::of(new),
            });
        }
        let binding = decode_secret_binding(new)?;

        let old_binding = match old {
            Some(old) if !is_secret_binding(old) => {
                return Err(ValidationError::WrongOldObjectType {
                    actual: ObjectType::of(old),
                });
            }
            Some(old) => Some(decode_secret_binding(old).map_err(ValidationError::DecodeOld)?),
            None => None,
        };

        self.validate_binding(&binding, old_binding.as_ref()).await
    }
}

/// Whether the credentials of `new` must be (re-)validated.
///
/// Always on CREATE. On UPDATE only when the provider type changed; a missing
/// provider on either side counts as a different type.
pub fn requires_credentials_check(new: &SecretBinding, old: Option<&SecretBinding>) -> bool {
    let Some(old) = old else {
        return true;
    };

    match (old.provider_type(), new.provider_type()) {
        (Some(old_type), Some(new_type)) => old_type != new_type,
        _ => true,
    }
}

/// Whether `obj` is a SecretBinding of any served version
pub fn is_secret_binding(obj: &DynamicObject) -> bool {
    let ty = ObjectType::of(obj);
    ty.kind == SecretBinding::kind(&()) && ty.group() == SecretBinding::group(&())
}

/// Decode the untyped object into a [`SecretBinding`]
pub fn decode_secret_binding(obj: &DynamicObject) -> Result<SecretBinding, serde_json::Error> {
    serde_json::to_value(obj).and_then(serde_json::from_value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    fn binding(provider: Option<&str>) -> SecretBinding {
        let mut b = SecretBinding::new("alicloud", "garden-dev", "my-provider-account");
        b.provider = provider.map(|t| crate::crd::SecretBindingProvider {
            r#type: t.to_string(),
        });
        b
    }

    #[test]
    fn test_create_requires_check() {
        assert!(requires_credentials_check(&binding(Some("alicloud")), None));
    }

    #[test]
    fn test_unchanged_type_skips_check() {
        let new = binding(Some("alicloud"));
        let old = binding(Some("alicloud"));
        assert!(!requires_credentials_check(&new, Some(&old)));
    }

    #[test]
    fn test_changed_type_requires_check() {
        let new = binding(Some("alicloud"));
        let old = binding(Some("aws"));
        assert!(requires_credentials_check(&new, Some(&old)));
    }

    #[test]
    fn test_provider_added_requires_check() {
        let new = binding(Some("alicloud"));
        let old = binding(None);
        assert!(requires_credentials_check(&new, Some(&old)));
    }

    #[test]
    fn test_provider_removed_requires_check() {
        let new = binding(None);
        let old = binding(Some("alicloud"));
        assert!(requires_credentials_check(&new, Some(&old)));
    }

    #[test]
    fn test_is_secret_binding_any_version() {
        let mut obj = binding(Some("alicloud")).to_dynamic().unwrap();
        assert!(is_secret_binding(&obj));

        if let Some(types) = obj.types.as_mut() {
            types.api_version = "core.gardener.cloud/v1alpha1".to_string();
        }
        assert!(is_secret_binding(&obj));
    }

    #[test]
    fn test_is_secret_binding_rejects_other_group() {
        let mut obj = binding(Some("alicloud")).to_dynamic().unwrap();
        if let Some(types) = obj.types.as_mut() {
            types.api_version = "security.gardener.cloud/v1alpha1".to_string();
        }
        assert!(!is_secret_binding(&obj));
    }

    #[test]
    fn test_decode_round_trips_fields() {
        let original = binding(Some("alicloud"));
        let decoded = decode_secret_binding(&original.to_dynamic().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }
}
