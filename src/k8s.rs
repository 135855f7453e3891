//! # Kubernetes Secret Fetch
//!
//! Thin read boundary around the Kubernetes API. The returned `Secret`
//! carries its `data` values as raw bytes: the client strips the base64
//! transport encoding during deserialization, so callers must not decode
//! again.

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::debug;

/// Connect using the ambient kubeconfig or in-cluster environment.
///
/// # Errors
///
/// Fails when no usable Kubernetes configuration can be inferred.
pub async fn connect() -> Result<Client> {
    Client::try_default()
        .await
        .context("failed to create Kubernetes client from kubeconfig or in-cluster config")
}

/// Fetch one named secret from one namespace. No retries; a fetch failure
/// is fatal for the invocation.
///
/// # Errors
///
/// Propagates the API error (not found, forbidden, connection refused)
/// wrapped with the secret's coordinates.
pub async fn fetch_secret(client: Client, name: &str, namespace: &str) -> Result<Secret> {
    let api: Api<Secret> = Api::namespaced(client, namespace);
    let secret = api
        .get(name)
        .await
        .with_context(|| format!("failed to get secret {namespace}/{name} from kubernetes"))?;

    debug!(
        "Fetched secret {}/{} with {} data field(s)",
        namespace,
        name,
        secret.data.as_ref().map_or(0, std::collections::BTreeMap::len)
    );
    Ok(secret)
}
