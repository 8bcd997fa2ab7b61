//! Startup orchestration.
//!
//! # Responsibilities
//! - Scan the repository into the first snapshot
//! - Start background tasks (metrics, watcher, rebuild loop)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when content is indexed)

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::repository::rebuild::run_rebuild_loop;
use crate::repository::{build_snapshot, RepositoryWatcher, ScanError, SnapshotStore};

/// Error type for startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("initial scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("failed to watch repository: {0}")]
    Watch(#[from] notify::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the content server until a stop signal arrives.
pub async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    let config = Arc::new(config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let snapshot = {
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || build_snapshot(&config))
            .await
            .map_err(std::io::Error::other)??
    };
    metrics::set_index_size(snapshot.items.len(), snapshot.files.len() + snapshot.items.file_count());
    let store = Arc::new(SnapshotStore::new(snapshot));

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    // Keep the watcher alive for the lifetime of the server.
    let _watcher = if config.repository.watch {
        let mut paths = vec![config.repository.path.clone()];
        paths.extend(config.repository.theme_dir.iter().filter(|p| p.is_dir()).cloned());

        let (watcher, changes) = RepositoryWatcher::new(paths);
        let watcher = watcher.run()?;
        tokio::spawn(run_rebuild_loop(
            Arc::clone(&store),
            Arc::clone(&config),
            changes,
            shutdown.subscribe(),
        ));
        Some(watcher)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(Arc::clone(&config), store);
    server.run(listener, shutdown.subscribe()).await?;

    shutdown.trigger();
    tracing::info!("Shutdown complete");
    Ok(())
}
