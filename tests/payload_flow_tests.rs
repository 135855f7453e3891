//! # Transform Flow Tests
//!
//! End-to-end tests of the pure transform pipeline: validated CLI config
//! plus a fetched Kubernetes secret in, destination payload out. No network
//! involved, mirroring what a dry run computes before printing.

use clap::Parser;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use k8s_to_secretsmanager::cli::Cli;
use k8s_to_secretsmanager::payload::{generate_secret_name, SecretBody, SecretPayload};

fn fetched_secret(fields: &[(&str, &[u8])]) -> Secret {
    Secret {
        data: Some(
            fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), ByteString(v.to_vec())))
                .collect(),
        ),
        ..Secret::default()
    }
}

fn parse(args: &[&str]) -> k8s_to_secretsmanager::cli::Config {
    let mut full = vec!["k8s-to-secretsmanager"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap().into_config().unwrap()
}

#[test]
fn test_string_mode_flow_produces_submittable_payload() {
    let config = parse(&[
        "-s",
        "db-creds",
        "-n",
        "payments",
        "-c",
        "prod-eks",
        "-k",
        "alias/eks-secrets",
        "-d",
        "payments db credentials",
    ]);
    let secret = fetched_secret(&[("password", b"hunter2"), ("username", b"app")]);

    let name = generate_secret_name(&config.cluster, &config.namespace, &config.secret);
    assert_eq!(name, "eks/prod-eks/payments/db-creds");

    let payload = SecretPayload::build(
        name,
        config.description,
        config.kms_key,
        config.binary,
        &secret,
        &config.tags,
    )
    .unwrap();

    assert_eq!(payload.name, "eks/prod-eks/payments/db-creds");
    assert_eq!(payload.description, "payments db credentials");
    assert_eq!(payload.kms_key_id, "alias/eks-secrets");
    assert_eq!(
        payload.body,
        SecretBody::String(r#"{"password":"hunter2","username":"app"}"#.to_string())
    );
    // Default upload tag rides along
    assert!(payload
        .tags
        .iter()
        .any(|t| t.key == "uploaded:by" && t.value == "k8s-to-secretsmanager"));
}

#[test]
fn test_binary_mode_flow_carries_single_blob() {
    let config = parse(&[
        "-s",
        "tls-cert",
        "-n",
        "ingress",
        "-c",
        "prod-eks",
        "-k",
        "alias/eks-secrets",
        "--binary",
    ]);
    let secret = fetched_secret(&[("cert.p12", &[0x30, 0x82, 0x01, 0x00])]);

    let name = generate_secret_name(&config.cluster, &config.namespace, &config.secret);
    let payload = SecretPayload::build(
        name,
        config.description,
        config.kms_key,
        config.binary,
        &secret,
        &config.tags,
    )
    .unwrap();

    assert_eq!(payload.body, SecretBody::Binary(vec![0x30, 0x82, 0x01, 0x00]));
}

#[test]
fn test_identical_runs_serialize_byte_identically() {
    let args = [
        "-s",
        "db-creds",
        "-n",
        "payments",
        "-c",
        "prod-eks",
        "-k",
        "alias/eks-secrets",
        "--tags",
        "env=prod,team=platform",
    ];
    let secret = fetched_secret(&[("b", b"2"), ("a", b"1")]);

    let render = || {
        let config = parse(&args);
        let name = generate_secret_name(&config.cluster, &config.namespace, &config.secret);
        let payload = SecretPayload::build(
            name,
            config.description,
            config.kms_key,
            config.binary,
            &secret,
            &config.tags,
        )
        .unwrap();
        serde_json::to_string(&payload).unwrap()
    };

    assert_eq!(render(), render());
}
