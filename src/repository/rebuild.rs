//! Debounced background rebuilds.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use crate::config::ServerConfig;
use crate::observability::metrics;
use crate::repository::{build_snapshot, SnapshotStore};

/// Rebuild the snapshot whenever `changes` fires, until shutdown.
///
/// Bursts of change events within `debounce` are folded into one rebuild.
/// The scan runs on a blocking thread; on failure the current snapshot
/// stays in service.
pub async fn run_rebuild_loop(
    store: Arc<SnapshotStore>,
    config: Arc<ServerConfig>,
    mut changes: mpsc::UnboundedReceiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let debounce = Duration::from_millis(config.repository.debounce_ms);

    loop {
        tokio::select! {
            change = changes.recv() => {
                if change.is_none() {
                    break;
                }
                tokio::time::sleep(debounce).await;
                while changes.try_recv().is_ok() {}

                rebuild(&store, &config).await;
            }
            _ = shutdown.recv() => break,
        }
    }

    tracing::debug!("Rebuild loop stopped");
}

/// Rescan once and swap in the result.
pub async fn rebuild(store: &Arc<SnapshotStore>, config: &Arc<ServerConfig>) -> bool {
    let start = Instant::now();
    let build_store = Arc::clone(store);
    let build_config = Arc::clone(config);

    let result = tokio::task::spawn_blocking(move || {
        build_store.rebuild_with(|| build_snapshot(&build_config))
    })
    .await;

    match result {
        Ok(Ok(generation)) => {
            let snapshot = store.load();
            metrics::record_rebuild(true, start);
            metrics::set_index_size(snapshot.items.len(), snapshot.files.len() + snapshot.items.file_count());
            tracing::info!(generation, elapsed_ms = start.elapsed().as_millis() as u64, "Content snapshot rebuilt");
            true
        }
        Ok(Err(e)) => {
            metrics::record_rebuild(false, start);
            tracing::error!(error = %e, "Rebuild failed. Keeping current snapshot.");
            false
        }
        Err(e) => {
            metrics::record_rebuild(false, start);
            tracing::error!(error = %e, "Rebuild task panicked. Keeping current snapshot.");
            false
        }
    }
}
