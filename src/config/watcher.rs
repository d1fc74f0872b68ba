//! Hot reload of backend defaults and configmap manifests.
//!
//! # Data Flow
//! ```text
//! config file modified
//!     → loader.rs (parse + validate; rejected reloads keep the current config)
//!     → diff against the last accepted config
//!     → ReloadEvent::Backend / ReloadEvent::Extraction (only what changed)
//!
//! manifest under store.path modified
//!     → ReloadEvent::StoreChanged (callers re-resolve)
//! ```
//!
//! # Design Decisions
//! - One notify watcher covers both the config file and the store directory
//! - Events carry deltas, so an unrelated edit never swaps the allow-list
//! - A store path change needs a restart; it is logged, not applied

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::annotations::FailurePolicy;
use crate::config::loader::load_config;
use crate::config::schema::ControllerConfig;
use crate::defaults::Backend;
use crate::store::EXTENSIONS;

/// A change callers must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// New backend defaults, including the response-header allow-list.
    Backend(Backend),
    /// New annotation prefix or failure policy.
    Extraction { prefix: String, policy: FailurePolicy },
    /// A configmap manifest was created, modified or removed.
    StoreChanged(PathBuf),
}

/// Which watched location a filesystem event touched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Trigger {
    Config,
    Manifest(PathBuf),
}

/// Watches the controller config file and its configmap directory.
pub struct ConfigWatcher {
    config_path: PathBuf,
    store_dir: PathBuf,
    current: ControllerConfig,
    events_tx: mpsc::UnboundedSender<ReloadEvent>,
}

impl ConfigWatcher {
    /// `current` is the config already in effect; reloads are diffed against it.
    pub fn new(
        config_path: &Path,
        current: ControllerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ReloadEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            config_path: absolute(config_path),
            store_dir: absolute(&current.store.path),
            current,
            events_tx,
        };
        (watcher, events_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            config_path,
            store_dir,
            mut current,
            events_tx,
        } = self;
        let (watched_config, watched_store) = (config_path.clone(), store_dir.clone());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
                    return;
                }

                for trigger in classify(&event.paths, &config_path, &store_dir) {
                    match trigger {
                        Trigger::Config => match load_config(&config_path) {
                            Ok(next) => {
                                for change in diff(&current, &next) {
                                    let _ = events_tx.send(change);
                                }
                                current = next;
                            }
                            Err(e) => {
                                tracing::error!(
                                    error = %e,
                                    sections = ?e.sections(),
                                    "Config reload rejected, keeping current configuration"
                                );
                            }
                        },
                        Trigger::Manifest(path) => {
                            tracing::debug!(path = ?path, "Configmap manifest changed");
                            let _ = events_tx.send(ReloadEvent::StoreChanged(path));
                        }
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched_config, RecursiveMode::NonRecursive)?;
        match watcher.watch(&watched_store, RecursiveMode::NonRecursive) {
            Ok(()) => tracing::info!(
                config = ?watched_config,
                store = ?watched_store,
                "Watching config file and configmap store"
            ),
            Err(e) => tracing::warn!(
                config = ?watched_config,
                store = ?watched_store,
                error = %e,
                "Store directory not watched, configmap edits need a config reload"
            ),
        }
        Ok(watcher)
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Map event paths to triggers, at most one `Config` per event.
fn classify(paths: &[PathBuf], config_path: &Path, store_dir: &Path) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    for path in paths {
        if path == config_path {
            if !triggers.contains(&Trigger::Config) {
                triggers.push(Trigger::Config);
            }
            continue;
        }
        let is_manifest = path.parent() == Some(store_dir)
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if is_manifest {
            triggers.push(Trigger::Manifest(path.clone()));
        }
    }
    triggers
}

/// Changes between two accepted configs that callers can apply live.
pub fn diff(current: &ControllerConfig, next: &ControllerConfig) -> Vec<ReloadEvent> {
    let mut changes = Vec::new();

    if current.backend != next.backend {
        changes.push(ReloadEvent::Backend(next.backend.clone()));
    }

    if current.annotations.prefix != next.annotations.prefix
        || current.custom_headers.failure_policy != next.custom_headers.failure_policy
    {
        changes.push(ReloadEvent::Extraction {
            prefix: next.annotations.prefix.clone(),
            policy: next.custom_headers.failure_policy,
        });
    }

    if current.store.path != next.store.path {
        tracing::warn!(
            current = ?current.store.path,
            requested = ?next.store.path,
            "Store path changes require a restart, keeping current store"
        );
    }

    changes
}
