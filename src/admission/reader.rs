//! # Secret Reader
//!
//! Read-only access to the credentials Secret a SecretBinding points at.
//!
//! The production reader talks to the API server directly instead of going
//! through an informer cache: the webhook must see the Secret as it is right
//! now, and watching every Secret in the cluster just to serve admission
//! requests would be wasteful.

use crate::observability::metrics;
use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Namespace/name of an object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Fetches Secrets by key.
///
/// Implementations must be safe for concurrent use. Errors are handed back to
/// the admission caller untouched, so they should already be descriptive.
/// Deadlines and cancellation belong to the caller's future.
#[async_trait]
pub trait SecretReader: Send + Sync {
    /// Get the Secret identified by `key`
    async fn get(&self, key: &ObjectKey) -> Result<Secret>;
}

#[async_trait]
impl<T: SecretReader + ?Sized> SecretReader for Arc<T> {
    async fn get(&self, key: &ObjectKey) -> Result<Secret> {
        (**self).get(key).await
    }
}

/// Reads Secrets straight from the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretReader {
    client: Client,
}

impl fmt::Debug for KubeSecretReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeSecretReader").finish_non_exhaustive()
    }
}

impl KubeSecretReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretReader for KubeSecretReader {
    async fn get(&self, key: &ObjectKey) -> Result<Secret> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &key.namespace);

        match secrets.get(&key.name).await {
            Ok(secret) => {
                debug!(secret = %key, "Fetched credentials secret");
                metrics::record_secret_fetch("success");
                Ok(secret)
            }
            Err(e) => {
                warn!(secret = %key, error = %e, "Failed to fetch credentials secret");
                metrics::record_secret_fetch("error");
                Err(e.into())
            }
        }
    }
}
