//! Route-based content index and request resolution.

pub mod config;
pub mod content;
pub mod http;
pub mod index;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod repository;
pub mod resolve;
pub mod rewrite;
pub mod route;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use repository::{ContentSnapshot, SnapshotStore};
pub use resolve::{Outcome, Resolver};
pub use route::Route;
