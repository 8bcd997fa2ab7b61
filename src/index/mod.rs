//! Route-keyed indexes.
//!
//! # Data Flow
//! ```text
//! Scanned entities (Item tree, theme Files)
//!     → route_index.rs (exact map + sorted route list, duplicate check)
//!     → item_index.rs (adds attached-file lookup)
//!     → frozen inside a ContentSnapshot
//! ```
//!
//! # Design Decisions
//! - Built once, immutable afterwards (shared without locks)
//! - O(1) exact lookup via HashMap keyed on Route
//! - Sorted route list so enumeration order never depends on hashing
//! - Duplicate routes fail the whole build

pub mod item_index;
pub mod route_index;

use thiserror::Error;

use crate::content::File;
use crate::route::Route;

pub use item_index::ItemIndex;
pub use route_index::RouteIndex;

/// Index of globally addressable files (theme / static assets).
pub type FileIndex = RouteIndex<File>;

/// Error type for index construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("duplicate route {route:?}")]
    DuplicateRoute { route: Route },
}
