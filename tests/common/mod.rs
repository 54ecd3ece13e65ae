//! Common utilities for integration tests
//!
//! Provides shared functionality for:
//! - A counting in-memory `SecretReader`
//! - SecretBinding and Secret fixtures

#![allow(dead_code, reason = "not every test binary uses every helper")]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::core::DynamicObject;
use secretbinding_validator::admission::{ObjectKey, SecretReader};
use secretbinding_validator::crd::SecretBinding;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const NAMESPACE: &str = "garden-dev";
pub const NAME: &str = "my-provider-account";

/// Error returned by a failing reader
#[derive(Debug, thiserror::Error)]
#[error("fake err")]
pub struct FakeError;

enum Response {
    Secret(Secret),
    Fail,
}

/// Reader answering every request the same way and recording the keys asked for
pub struct MockSecretReader {
    response: Response,
    calls: Mutex<Vec<ObjectKey>>,
}

impl MockSecretReader {
    /// Reader returning a Secret with `data`
    pub fn returning(data: &[(&str, &str)]) -> Self {
        Self {
            response: Response::Secret(secret_with(data)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reader failing every call with [`FakeError`]
    pub fn failing() -> Self {
        Self {
            response: Response::Fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Keys requested so far
    pub fn calls(&self) -> Vec<ObjectKey> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl SecretReader for MockSecretReader {
    async fn get(&self, key: &ObjectKey) -> anyhow::Result<Secret> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(key.clone());
        match &self.response {
            Response::Secret(secret) => Ok(secret.clone()),
            Response::Fail => Err(FakeError.into()),
        }
    }
}

/// Secret named like the test binding's reference, carrying `data`
pub fn secret_with(data: &[(&str, &str)]) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        data: Some(
            data.iter()
                .map(|(k, v)| ((*k).to_string(), ByteString(v.as_bytes().to_vec())))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    }
}

/// Secret data passing the Alibaba Cloud checks
pub fn valid_data() -> Vec<(&'static str, String)> {
    vec![
        ("accessKeyID", "a".repeat(16)),
        ("accessKeySecret", "b".repeat(30)),
    ]
}

/// Reader returning [`valid_data`]
pub fn valid_reader() -> MockSecretReader {
    let data = valid_data();
    let pairs: Vec<(&str, &str)> = data.iter().map(|(k, v)| (*k, v.as_str())).collect();
    MockSecretReader::returning(&pairs)
}

/// Reader returning a Secret without the required fields
pub fn invalid_reader() -> MockSecretReader {
    MockSecretReader::returning(&[("foo", "bar")])
}

/// Alicloud binding pointing at `garden-dev/my-provider-account`
pub fn alicloud_binding() -> SecretBinding {
    SecretBinding::new("alicloud", NAMESPACE, NAME)
}

/// Untyped form of `binding`
pub fn dynamic(binding: &SecretBinding) -> DynamicObject {
    binding.to_dynamic().expect("SecretBinding must convert to DynamicObject")
}

/// An empty core/v1 Secret as an untyped admission object
pub fn dynamic_secret() -> DynamicObject {
    serde_json::from_value(serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": { "name": NAME, "namespace": NAMESPACE }
    }))
    .expect("Secret must convert to DynamicObject")
}
