//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → resolver (on a blocking thread, one snapshot per request)
//!     → response.rs (outcome → status, headers, body)
//!     → mime.rs (content type from bytes, then extension)
//!     → Send to client
//! ```

pub mod mime;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
