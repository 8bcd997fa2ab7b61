//! Routed content entities.
//!
//! # Data Flow
//! ```text
//! Repository scan
//!     → provider.rs (lazy byte + hash capability per resource)
//!     → file.rs (Route + provider)
//!     → item.rs (Route + provider + metadata + children + files)
//!     → index subsystem
//! ```
//!
//! # Design Decisions
//! - Entities are immutable once built and shared via `Arc`
//! - Bytes are never held by the entity; providers read on demand
//! - Providers are trait objects so tests can substitute in-memory data

pub mod file;
pub mod item;
pub mod provider;

pub use file::File;
pub use item::{Item, ItemMetadata, ItemType};
pub use provider::{ContentError, ContentProvider, FileContentProvider, MemoryContentProvider};

use crate::route::Route;

/// Anything addressable by a single route.
pub trait Routed {
    fn route(&self) -> &Route;
}
