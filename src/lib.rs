//! # k8s-to-secretsmanager
//!
//! Copies a single Kubernetes Secret into AWS Secrets Manager under an
//! EKS-derived name.
//!
//! The flow is deliberately linear:
//!
//! 1. Fetch the secret from Kubernetes ([`k8s`])
//! 2. Derive the destination name `eks/<cluster>/<namespace>/<name>` and
//!    build the create-secret payload ([`payload`])
//! 3. Submit it, or print it in dry-run mode ([`aws`])
//!
//! One secret per invocation, no retries, no concurrency. Any failure
//! terminates with a non-zero exit status.

pub mod aws;
pub mod cli;
pub mod k8s;
pub mod payload;
