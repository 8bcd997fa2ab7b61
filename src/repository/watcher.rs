//! Repository watcher for index rebuilds.

use std::path::PathBuf;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// A watcher that monitors content directories for changes.
pub struct RepositoryWatcher {
    paths: Vec<PathBuf>,
    change_tx: mpsc::UnboundedSender<()>,
}

impl RepositoryWatcher {
    /// Create a new RepositoryWatcher.
    ///
    /// Returns the watcher and a receiver that gets one message per change event.
    pub fn new(paths: Vec<PathBuf>) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        (Self { paths, change_tx }, change_rx)
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.change_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::debug!(paths = ?event.paths, "Repository change detected");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in &self.paths {
            watcher.watch(path, RecursiveMode::Recursive)?;
            tracing::info!(path = ?path, "Repository watcher started");
        }
        Ok(watcher)
    }
}
