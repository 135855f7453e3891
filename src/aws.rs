//! # AWS Secrets Manager Submission
//!
//! Write boundary around the Secrets Manager `CreateSecret` call.
//!
//! In dry-run mode the would-be request is serialized to stdout and no
//! network call is made, so dry runs can never fail on destination-side
//! conditions (permissions, naming conflicts, bad KMS key). There is no
//! retry logic; a service error is surfaced to the caller as-is.

use crate::payload::{SecretBody, SecretPayload};
use anyhow::{Context, Result};
use aws_sdk_secretsmanager::primitives::Blob;
use aws_sdk_secretsmanager::types::Tag;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde::Serialize;
use tracing::info;

/// Acknowledgment from the service after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSecretAck {
    pub arn: Option<String>,
    pub name: Option<String>,
    pub version_id: Option<String>,
}

/// Submits destination payloads, or prints them when `dry_run` is set.
pub struct SecretWriter {
    client: SecretsManagerClient,
    region: String,
    dry_run: bool,
}

impl std::fmt::Debug for SecretWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretWriter")
            .field("region", &self.region)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl SecretWriter {
    /// Create a Secrets Manager client for the given region and shared
    /// config profile, using the SDK's default credential chain.
    pub async fn new(region: &str, profile: &str, dry_run: bool) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .profile_name(profile)
            .load()
            .await;

        Self {
            client: SecretsManagerClient::new(&sdk_config),
            region: region.to_string(),
            dry_run,
        }
    }

    /// Submit the payload with a single `CreateSecret` call, or print it in
    /// dry-run mode. On success the service acknowledgment is pretty-printed
    /// to stdout.
    ///
    /// # Errors
    ///
    /// Propagates the service error unchanged inside an anyhow context;
    /// authorization, naming-conflict, and encryption-key failures all
    /// surface here. Never errors on service conditions in dry-run mode.
    pub async fn create_secret(&self, payload: &SecretPayload) -> Result<()> {
        if self.dry_run {
            info!("Would have run CreateSecret with the following input");
            println!(
                "{}",
                serde_json::to_string_pretty(payload)
                    .context("failed to serialize dry-run output")?
            );
            return Ok(());
        }

        info!("Using kms key: {} for encryption", payload.kms_key_id);

        let mut request = self
            .client
            .create_secret()
            .name(&payload.name)
            .description(&payload.description)
            .kms_key_id(&payload.kms_key_id);

        for tag in &payload.tags {
            request = request.tags(
                Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build(),
            );
        }

        request = match &payload.body {
            SecretBody::Binary(bytes) => request.secret_binary(Blob::new(bytes.clone())),
            SecretBody::String(text) => request.secret_string(text),
        };

        let output = request.send().await.with_context(|| {
            format!(
                "failed to create secretsmanager secret {} in {}",
                payload.name, self.region
            )
        })?;

        info!("Successfully created secret!");
        let ack = CreateSecretAck {
            arn: output.arn().map(ToString::to_string),
            name: output.name().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&ack).context("failed to serialize output json")?
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_with_service_field_names() {
        let ack = CreateSecretAck {
            arn: Some("arn:aws:secretsmanager:us-east-1:123:secret:eks/c/n/s".to_string()),
            name: Some("eks/c/n/s".to_string()),
            version_id: None,
        };
        let json: serde_json::Value = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["Name"], "eks/c/n/s");
        assert!(json["Arn"].as_str().unwrap().starts_with("arn:aws:"));
        assert_eq!(json["VersionId"], serde_json::Value::Null);
    }
}
