//! Request rewrite rules.
//!
//! # Data Flow
//! ```text
//! [[rewrites]] in config (pattern, target)
//!     → rule.rs (compile regex, parse target route)
//!     → RewriteSet (declaration order preserved)
//!     → resolver asks for matching targets of an unmatched request
//! ```
//!
//! # Design Decisions
//! - Patterns and targets are validated at configuration time only
//! - First matching rule wins; a missing target falls through to the next
//! - A match says nothing about target existence

pub mod rule;

pub use rule::{RequestRewrite, RewriteError, RewriteSet};
