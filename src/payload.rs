//! # Secret Payload Construction
//!
//! Pure transform layer that turns a fetched Kubernetes `Secret` into the
//! request value submitted to AWS Secrets Manager. No network I/O happens
//! here; submission lives in [`crate::aws`].
//!
//! The payload carries exactly one body form:
//! - binary mode: the single field's raw bytes, verbatim
//! - string mode: the full field map re-encoded as a JSON object of text
//!   values

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use k8s_openapi::api::core::v1::Secret;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the new secret in Secrets Manager.
///
/// Format is: `eks/<cluster>/<namespace>/<name>`
///
/// Plain substitution, no escaping and no character-set validation. The
/// function is pure so repeated runs against the same inputs target the same
/// destination secret.
#[must_use]
pub fn generate_secret_name(cluster: &str, namespace: &str, name: &str) -> String {
    format!("eks/{cluster}/{namespace}/{name}")
}

/// Merge two tag maps; `overlay` wins when a key exists in both.
///
/// Neither input is mutated. The result is a `BTreeMap` so the combined key
/// set has a stable, sorted order and two runs with identical inputs produce
/// byte-identical downstream requests.
#[must_use]
pub fn merge_tags(
    base: &BTreeMap<String, String>,
    overlay: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Tags applied to every created secret unless the caller overrides them.
#[must_use]
pub fn default_tags() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "uploaded:by".to_string(),
        "k8s-to-secretsmanager".to_string(),
    )])
}

/// Errors from payload construction. All are fatal; the caller exits
/// without retrying.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The source secret carried no data fields.
    #[error("no data in requested secret")]
    EmptyInput,

    /// Binary mode can carry only a single unnamed blob downstream.
    #[error("too many binary values in secret: found {0} fields, binary secrets carry exactly one")]
    TooManyFields(usize),

    /// String mode reinterprets field bytes as UTF-8 text; refuse fields
    /// that would produce mangled JSON instead of silently replacing bytes.
    #[error("secret field {key:?} is not valid UTF-8 text")]
    InvalidEncoding {
        key: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// JSON encoding of the field map failed.
    #[error("failed to serialize secret data as JSON")]
    Serialization(#[from] serde_json::Error),
}

/// A single destination tag. Serialized field names match the Secrets
/// Manager request shape so dry-run output reads like the real request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

/// The secret body, exactly one form. Constructing a payload with both or
/// neither form is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretBody {
    /// Raw bytes of the single source field, no transcoding.
    Binary(Vec<u8>),
    /// JSON object mapping field name to UTF-8 text value.
    String(String),
}

impl Serialize for SecretBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            // Binary payloads are base64 in the printed request, matching
            // how the AWS API represents SecretBinary on the wire
            Self::Binary(bytes) => {
                map.serialize_entry("SecretBinary", &BASE64_STANDARD.encode(bytes))?;
            }
            Self::String(text) => map.serialize_entry("SecretString", text)?,
        }
        map.end()
    }
}

/// Fully-built `CreateSecret` request value, ready for submission or
/// dry-run printing. Single-use: constructed once per invocation, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretPayload {
    pub name: String,
    pub description: String,
    pub kms_key_id: String,
    pub tags: Vec<TagPair>,
    #[serde(flatten)]
    pub body: SecretBody,
}

impl SecretPayload {
    /// Build the destination payload from a fetched Kubernetes secret.
    ///
    /// `description` and `kms_key_id` are copied through verbatim; an
    /// invalid KMS key reference is only detected by the service itself.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::EmptyInput`] when the secret has no data fields
    /// - [`PayloadError::TooManyFields`] when `binary` is set and the secret
    ///   has more than one field
    /// - [`PayloadError::InvalidEncoding`] when a field is not UTF-8 in
    ///   string mode
    pub fn build(
        name: String,
        description: String,
        kms_key_id: String,
        binary: bool,
        source: &Secret,
        tags: &BTreeMap<String, String>,
    ) -> Result<Self, PayloadError> {
        // Values in `Secret.data` are raw bytes: the Kubernetes client has
        // already stripped the base64 transport encoding.
        let data = source.data.as_ref().filter(|d| !d.is_empty());
        let Some(data) = data else {
            return Err(PayloadError::EmptyInput);
        };

        let body = if binary {
            if data.len() > 1 {
                return Err(PayloadError::TooManyFields(data.len()));
            }
            let bytes = data.values().next().map(|v| v.0.clone()).unwrap_or_default();
            SecretBody::Binary(bytes)
        } else {
            // BTreeMap keeps the serialized object's key order sorted
            let mut decoded = BTreeMap::new();
            for (key, value) in data {
                let text =
                    std::str::from_utf8(&value.0).map_err(|source| PayloadError::InvalidEncoding {
                        key: key.clone(),
                        source,
                    })?;
                decoded.insert(key.as_str(), text);
            }
            SecretBody::String(serde_json::to_string(&decoded)?)
        };

        let tags = tags
            .iter()
            .map(|(key, value)| TagPair {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(Self {
            name,
            description,
            kms_key_id,
            tags,
            body,
        })
    }
}
