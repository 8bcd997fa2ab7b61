//! Hierarchical route subsystem.
//!
//! # Data Flow
//! ```text
//! Request path ("/Docs/Intro/?x=1")
//!     → Route::from_request_path (strip query, percent-decode)
//!     → Route::parse (split, trim, drop empty, fold case)
//!     → Route ("docs/intro")
//!
//! Repository scan (relative directory path)
//!     → Route::parse
//!     → key into ItemIndex / FileIndex
//! ```
//!
//! # Design Decisions
//! - Immutable value type, compared by canonical string
//! - Case-insensitive: segments are folded to lowercase
//! - No percent-decoding in `parse` so that parsing is idempotent
//! - `..` is rejected rather than resolved

pub mod path;

pub use path::{Route, RouteError};
