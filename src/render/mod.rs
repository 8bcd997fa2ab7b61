//! Item rendering collaborators.
//!
//! # Data Flow
//! ```text
//! Outcome::ResolvedItem(item)
//!     → view_model.rs (presentational fields)
//!     → renderer.rs (HTML page or JSON document)
//!     → HTTP response body
//! ```
//!
//! # Design Decisions
//! - Content is passed through as text; no Markdown conversion happens here
//! - Renderers are trait objects chosen per request

pub mod renderer;
pub mod view_model;

pub use renderer::{renderer_for, HtmlRenderer, ItemRenderer, JsonRenderer, RenderError};
pub use view_model::{LinkModel, ViewModel};
