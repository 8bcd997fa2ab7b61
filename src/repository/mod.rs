//! Content repository subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ServerConfig
//!     → scan.rs (walk repository dir → Item tree, theme dir → Files)
//!     → ItemIndex + FileIndex + RewriteSet
//!     → ContentSnapshot
//!     → SnapshotStore (ArcSwap)
//!
//! On repository change:
//!     watcher.rs (notify) signals a change
//!     → rebuild.rs debounces, rescans on a blocking thread
//!     → atomic swap of Arc<ContentSnapshot>
//!     → requests already in flight keep their old snapshot
//! ```
//!
//! # Design Decisions
//! - Snapshot is immutable once built; changes require a full rescan
//! - A failed rebuild keeps the previous snapshot in service
//! - Readers never lock; they capture one `Arc` per request

pub mod rebuild;
pub mod scan;
pub mod snapshot;
pub mod watcher;

pub use scan::{build_snapshot, scan_repository, scan_theme, ScanError};
pub use snapshot::{ContentSnapshot, SnapshotStore};
pub use watcher::RepositoryWatcher;
