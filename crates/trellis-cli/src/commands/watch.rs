use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use trellis::{Config, HotReloadWatcher, ReloadEvent, RouteTable, SharedTree};

pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    if !config.dev.hot_reload {
        println!("{}", "⚠ Hot reload is disabled in [dev]".yellow());
        return Ok(());
    }

    let table = RouteTable::from_config(&config)?;
    println!(
        "{} {} resources from {}",
        "✓".green(),
        table.root.size(),
        config_path.display()
    );

    let tree = Arc::new(SharedTree::new(table.root));
    let poll_interval = Duration::from_millis(config.dev.poll_interval_ms);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let watcher = HotReloadWatcher::new(config_path, Arc::clone(&tree), poll_interval)?;
            let mut rx = watcher.subscribe();

            println!("{}", "Watching for changes (Ctrl+C to stop)".cyan());
            println!();

            loop {
                tokio::select! {
                    event = rx.recv() => match event {
                        Ok(ReloadEvent::Reloaded { resources }) => {
                            println!("{} Reloaded {} resources", "🔄".yellow(), resources);
                        }
                        Ok(ReloadEvent::Failed { error }) => {
                            eprintln!("{} Keeping current routes: {}", "❌".red(), error);
                        }
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            Ok::<_, anyhow::Error>(())
        })
}
