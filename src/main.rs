//! Ingress header-override resolver (v1)
//!
//! Resolves the `custom-headers` annotation of ingress manifests against a
//! directory of configmaps and the configured response-header allow-list.
//!
//! # Architecture Overview
//!
//! ```text
//!   Ingress manifest ──▶ annotations::Extractor ──▶ resolver::resolve ──▶ Config
//!                              │                        │      │
//!                              │                        ▼      ▼
//!                              │               DirectoryStore  SharedBackend
//!                              │               (configmaps)    (allow-list)
//!                              ▼                    ▲             ▲
//!                        FailurePolicy              └─ config::ConfigWatcher
//!                                                      (manifests, defaults)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use ingress_headers::annotations::Extractor;
use ingress_headers::config::{load_config, ConfigWatcher, ControllerConfig, ReloadEvent};
use ingress_headers::defaults::SharedBackend;
use ingress_headers::ingress::Ingress;
use ingress_headers::observability::logging;
use ingress_headers::resolver::Context;
use ingress_headers::store::DirectoryStore;

type HostContext = Context<DirectoryStore, SharedBackend>;

#[derive(Parser)]
#[command(name = "ingress-headers")]
#[command(about = "Resolve custom response headers for ingress resources", long_about = None)]
struct Cli {
    /// Controller configuration file (TOML).
    #[arg(short, long, default_value = "ingress-headers.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration file
    Check,
    /// Resolve the header overrides of one ingress manifest
    Resolve {
        /// Ingress manifest (JSON).
        #[arg(short, long)]
        ingress: PathBuf,
    },
    /// Re-resolve an ingress manifest whenever the configuration changes
    Watch {
        /// Ingress manifest (JSON).
        #[arg(short, long)]
        ingress: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(path = ?cli.config, error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    logging::init(&config.observability.log_level);

    tracing::info!(
        path = ?cli.config,
        prefix = %config.annotations.prefix,
        allowed_headers = config.backend.allowed_response_headers.len(),
        failure_policy = ?config.custom_headers.failure_policy,
        store = ?config.store.path,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Check => {
            println!("configuration {} is valid", cli.config.display());
        }
        Commands::Resolve { ingress } => {
            let ctx = host_context(&config);
            let output = resolve_once(&ctx, &config, &ingress)?;
            println!("{}", output);
        }
        Commands::Watch { ingress } => {
            watch(&cli.config, config, &ingress).await?;
        }
    }

    Ok(())
}

fn host_context(config: &ControllerConfig) -> HostContext {
    Context::new(
        Arc::new(DirectoryStore::new(&config.store.path)),
        Arc::new(SharedBackend::new(config.backend.clone())),
    )
}

/// Resolve `ingress` and render the overrides as JSON (`null` when disabled).
fn resolve_once(
    ctx: &HostContext,
    config: &ControllerConfig,
    ingress: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let ing = Ingress::from_file(ingress)?;
    let extractor = Extractor::new(
        ctx.clone(),
        config.annotations.prefix.clone(),
        config.custom_headers.failure_policy,
    );
    let parsed = extractor.extract(&ing)?;
    Ok(serde_json::to_string_pretty(&parsed.custom_headers)?)
}

async fn watch(
    path: &Path,
    mut config: ControllerConfig,
    ingress: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = host_context(&config);
    let (watcher, mut events) = ConfigWatcher::new(path, config.clone());
    let _watcher = watcher.run()?;

    report(&ctx, &config, ingress);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    ReloadEvent::Backend(backend) => {
                        tracing::info!(
                            allowed_headers = backend.allowed_response_headers.len(),
                            "Backend defaults reloaded"
                        );
                        ctx.defaults.store(backend.clone());
                        config.backend = backend;
                    }
                    ReloadEvent::Extraction { prefix, policy } => {
                        tracing::info!(prefix = %prefix, failure_policy = ?policy, "Annotation settings reloaded");
                        config.annotations.prefix = prefix;
                        config.custom_headers.failure_policy = policy;
                    }
                    ReloadEvent::StoreChanged(manifest) => {
                        tracing::info!(manifest = ?manifest, "Configmap changed");
                    }
                }
                report(&ctx, &config, ingress);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

fn report(ctx: &HostContext, config: &ControllerConfig, ingress: &Path) {
    match resolve_once(ctx, config, ingress) {
        Ok(output) => println!("{}", output),
        Err(e) => tracing::error!(ingress = ?ingress, error = %e, "Resolution failed"),
    }
}
