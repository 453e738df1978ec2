use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use trellis_router::SharedTree;

use crate::routes::RouteTable;

/// Outcome of reloading the route declarations
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadEvent {
    /// A new tree was swapped in
    Reloaded { resources: usize },
    /// The declarations were invalid, the previous tree is still in use
    Failed { error: String },
}

/// Rebuilds the tree from the declarations at `path` and swaps it in
///
/// On error the shared tree is left untouched.
pub fn reload(path: &Path, tree: &SharedTree) -> Result<usize> {
    let table = RouteTable::load(path)?;
    let resources = table.root.size();
    tree.replace(table.root);
    info!("Reloaded {:?} ({} resources)", path, resources);
    Ok(resources)
}

/// Watches the route declarations and reloads the shared tree on change
pub struct HotReloadWatcher {
    tx: broadcast::Sender<ReloadEvent>,
    _watcher: RecommendedWatcher,
}

impl HotReloadWatcher {
    /// Create a watcher for `config_path`
    ///
    /// The parent directory is watched so that editors replacing the file
    /// are noticed too.
    pub fn new(
        config_path: impl Into<PathBuf>,
        tree: Arc<SharedTree>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let config_path = config_path.into();
        let (tx, _) = broadcast::channel(16);
        let tx_clone = tx.clone();

        let file_name = config_path
            .file_name()
            .map(|name| name.to_os_string())
            .with_context(|| format!("Not a file path: {:?}", config_path))?;
        let watch_dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let reload_path = config_path.clone();

        let handler = move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                if !event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()))
                {
                    return;
                }

                info!("File changed: {:?}", reload_path);
                let event = match reload(&reload_path, &tree) {
                    Ok(resources) => ReloadEvent::Reloaded { resources },
                    Err(e) => {
                        error!("Reload failed, keeping current routes: {:#}", e);
                        ReloadEvent::Failed {
                            error: format!("{:#}", e),
                        }
                    }
                };

                // Ignore if no receivers
                let _ = tx_clone.send(event);
            }
            Err(e) => error!("Watch error: {:?}", e),
        };

        let mut watcher = RecommendedWatcher::new(
            handler,
            notify::Config::default().with_poll_interval(poll_interval),
        )?;

        if watch_dir.exists() {
            watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
            info!("Watching: {:?}", config_path);
        } else {
            warn!("Path does not exist: {:?}", watch_dir);
        }

        Ok(Self {
            tx,
            _watcher: watcher,
        })
    }

    /// Subscribe to reload events
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }
}
