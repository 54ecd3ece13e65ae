//! # SecretBinding
//!
//! Gardener's `SecretBinding` is not a CRD with a `spec`; its fields live at the
//! top level of the object, so the resource is described by hand instead of
//! through `#[derive(CustomResource)]`.

use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::NamespaceResourceScope;
use kube::core::{DynamicObject, Resource};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// API group of Gardener core resources
pub const GROUP: &str = "core.gardener.cloud";

/// Served API version
pub const VERSION: &str = "v1beta1";

/// Resource kind
pub const KIND: &str = "SecretBinding";

/// Binding between a credentials Secret and a cloud provider type
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Secret holding the provider credentials
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret_ref: SecretBindingSecretRef,
    /// Provider the credentials belong to. Absent on legacy bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<SecretBindingProvider>,
    /// Quotas applied to shoots using this binding
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotas: Vec<ObjectReference>,
}

/// Reference to the credentials Secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBindingSecretRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Empty means the binding's own namespace
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub namespace: String,
}

/// Provider declaration of a SecretBinding
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBindingProvider {
    /// Provider type tag, e.g. `alicloud`. Empty when the body omits it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub r#type: String,
}

/// Treat an explicit `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SecretBinding {
    /// Create a binding of `provider_type` pointing at `namespace/name`
    pub fn new(provider_type: &str, namespace: &str, name: &str) -> Self {
        Self {
            metadata: ObjectMeta::default(),
            secret_ref: SecretBindingSecretRef {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            provider: Some(SecretBindingProvider {
                r#type: provider_type.to_string(),
            }),
            quotas: Vec::new(),
        }
    }

    /// Provider type tag, `None` when no provider is declared
    pub fn provider_type(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.r#type.as_str())
    }

    /// Namespace of the referenced Secret, defaulting to the binding's namespace
    pub fn secret_namespace(&self) -> &str {
        if self.secret_ref.namespace.is_empty() {
            self.metadata.namespace.as_deref().unwrap_or_default()
        } else {
            &self.secret_ref.namespace
        }
    }

    /// Convert into the untyped form delivered by admission reviews
    pub fn to_dynamic(&self) -> Result<DynamicObject, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.insert(
                "apiVersion".to_string(),
                serde_json::Value::String(Self::api_version(&()).into_owned()),
            );
            map.insert(
                "kind".to_string(),
                serde_json::Value::String(KIND.to_string()),
            );
        }
        serde_json::from_value(value)
    }
}

impl Resource for SecretBinding {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(KIND)
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(GROUP)
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(VERSION)
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("secretbindings")
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
