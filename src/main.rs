//! Binary entry point: parse flags, fetch the Kubernetes secret, build the
//! Secrets Manager payload, submit (or print in dry-run mode).

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::error;

use k8s_to_secretsmanager::aws::SecretWriter;
use k8s_to_secretsmanager::cli::{Cli, Config};
use k8s_to_secretsmanager::k8s;
use k8s_to_secretsmanager::payload::{generate_secret_name, SecretPayload};

#[tokio::main]
async fn main() {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "k8s_to_secretsmanager=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.version {
        print_version();
        return;
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(missing) => {
            error!("{missing}");
            // Usage goes to stderr alongside the error, before any network
            // activity
            let _ = Cli::command().write_help(&mut std::io::stderr());
            eprintln!();
            std::process::exit(1);
        }
    };

    if let Err(err) = run(config).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let client = k8s::connect().await?;
    let secret = k8s::fetch_secret(client, &config.secret, &config.namespace).await?;

    let name = generate_secret_name(&config.cluster, &config.namespace, &config.secret);
    let payload = SecretPayload::build(
        name,
        config.description,
        config.kms_key,
        config.binary,
        &secret,
        &config.tags,
    )?;

    let writer = SecretWriter::new(&config.region, &config.profile, config.dry_run).await;
    writer.create_secret(&payload).await
}

fn print_version() {
    println!(
        "k8s-to-secretsmanager\ncommit: {}\nrustc version: {}",
        env!("BUILD_GIT_HASH"),
        env!("BUILD_RUSTC_VERSION"),
    );
}
