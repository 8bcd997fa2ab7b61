//! Request resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → Route::from_request_path
//!     → resolver.rs runs Stage::ORDER against one ContentSnapshot:
//!         Theme    → FileIndex (only below the theme route)
//!         Item     → ItemIndex exact match
//!         ItemFile → ItemIndex attached-file match
//!         Rewrite  → RewriteSet targets → FileIndex
//!     → outcome.rs (ResolvedFile | ResolvedItem | NotFound | Error)
//!     → HTTP layer renders / streams
//! ```
//!
//! # Design Decisions
//! - Stateless per request; indexes are never mutated
//! - Stage order is an explicit array, first success wins
//! - File bytes are read inside resolution so unreadable content is a
//!   distinct outcome rather than a not-found
//! - Cancellation is checked before every stage and before reading bytes

pub mod outcome;
pub mod resolver;
pub mod stage;

pub use outcome::{Outcome, ResolveError, ResolvedFile};
pub use resolver::Resolver;
pub use stage::Stage;
