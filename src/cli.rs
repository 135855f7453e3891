//! # Command-line Interface
//!
//! Flag parsing and validation for the `k8s-to-secretsmanager` binary.
//!
//! Required flags are checked here rather than by clap's `required` so a
//! missing flag logs an error, prints usage, and exits with status 1 before
//! any network activity. Validation produces a [`Config`] value that the
//! transform functions take by reference, keeping them testable without any
//! process-level flag state.

use crate::payload::{default_tags, merge_tags};
use clap::Parser;
use std::collections::BTreeMap;
use thiserror::Error;

/// Copy a Kubernetes Secret into AWS Secrets Manager
#[derive(Parser, Debug)]
#[command(
    name = "k8s-to-secretsmanager",
    about = "Copy a Kubernetes Secret into AWS Secrets Manager under an EKS-derived name",
    disable_version_flag = true
)]
pub struct Cli {
    /// Should the resulting secret in Secrets Manager be of type binary
    #[arg(long)]
    pub binary: bool,

    /// Print the create-secret input instead of running the actual
    /// create-secret call. THIS WILL PRINT SECRETS TO STDOUT, BE CAREFUL
    #[arg(long)]
    pub dry_run: bool,

    /// Name of the secret to retrieve from Kubernetes and use in the new
    /// Secrets Manager secret
    #[arg(short, long)]
    pub secret: Option<String>,

    /// Namespace of the secret in Kubernetes
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// EKS cluster the secret is going to be used in
    #[arg(short, long)]
    pub cluster: Option<String>,

    /// (Optional) description to use for the new secret in Secrets Manager
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// KMS key to use for encryption of the secret in Secrets Manager
    #[arg(short = 'k', long = "kmskey")]
    pub kms_key: Option<String>,

    /// List of key=value pairs to use as tags for the Secrets Manager
    /// secret (separated by comma); merged over the default
    /// uploaded:by=k8s-to-secretsmanager tag
    #[arg(long, value_delimiter = ',', value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,

    /// Region to use for AWS API calls
    #[arg(short, long, default_value = "us-east-1")]
    pub region: String,

    /// AWS profile to use for API calls
    #[arg(short, long, default_value = "default")]
    pub profile: String,

    /// Print version info
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// A required flag was not supplied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissingFlag {
    #[error("secret name flag is required")]
    Secret,
    #[error("secret namespace flag is required")]
    Namespace,
    #[error("eks cluster name flag is required")]
    Cluster,
    #[error("KMS key flag is required")]
    KmsKey,
}

/// Validated invocation parameters, decoupled from flag parsing.
#[derive(Debug, Clone)]
pub struct Config {
    pub secret: String,
    pub namespace: String,
    pub cluster: String,
    pub description: String,
    pub kms_key: String,
    pub binary: bool,
    pub dry_run: bool,
    pub region: String,
    pub profile: String,
    /// Default tags merged with the user-supplied overrides, sorted by key.
    pub tags: BTreeMap<String, String>,
}

impl Cli {
    /// Check required flags and fold the tag flags over the defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`MissingFlag`] encountered, in the same order the
    /// flags are checked at startup: secret, namespace, cluster, kmskey.
    pub fn into_config(self) -> Result<Config, MissingFlag> {
        let secret = self
            .secret
            .filter(|s| !s.is_empty())
            .ok_or(MissingFlag::Secret)?;
        let namespace = self
            .namespace
            .filter(|s| !s.is_empty())
            .ok_or(MissingFlag::Namespace)?;
        let cluster = self
            .cluster
            .filter(|s| !s.is_empty())
            .ok_or(MissingFlag::Cluster)?;
        let kms_key = self
            .kms_key
            .filter(|s| !s.is_empty())
            .ok_or(MissingFlag::KmsKey)?;

        let overrides: BTreeMap<String, String> = self.tags.into_iter().collect();
        let tags = merge_tags(&default_tags(), &overrides);

        Ok(Config {
            secret,
            namespace,
            cluster,
            description: self.description,
            kms_key,
            binary: self.binary,
            dry_run: self.dry_run,
            region: self.region,
            profile: self.profile,
            tags,
        })
    }
}

/// Parse a single `key=value` tag flag element.
fn parse_tag(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid tag {raw:?}: expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid tag {raw:?}: empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_splits_on_first_equals() {
        assert_eq!(
            parse_tag("team=platform").unwrap(),
            ("team".to_string(), "platform".to_string())
        );
        // Colons in keys and equals signs in values pass through
        assert_eq!(
            parse_tag("uploaded:by=a=b").unwrap(),
            ("uploaded:by".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn parse_tag_rejects_malformed_input() {
        assert!(parse_tag("no-separator").is_err());
        assert!(parse_tag("=value").is_err());
    }

    #[test]
    fn parse_tag_allows_empty_value() {
        assert_eq!(
            parse_tag("key=").unwrap(),
            ("key".to_string(), String::new())
        );
    }
}
