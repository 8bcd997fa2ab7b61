//! Resolution outcomes.

use std::sync::Arc;

use thiserror::Error;

use crate::content::{ContentError, File, Item};
use crate::resolve::Stage;
use crate::route::{Route, RouteError};

/// Per-request failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    MalformedRoute(#[from] RouteError),

    #[error("content for {route:?} is unavailable: {source}")]
    ContentUnavailable {
        route: Route,
        #[source]
        source: ContentError,
    },

    #[error("resolution cancelled")]
    Cancelled,
}

/// A file matched by one of the stages, with its bytes already read.
#[derive(Debug)]
pub struct ResolvedFile {
    /// The route that was requested.
    pub route: Route,
    pub file: Arc<File>,
    pub data: Vec<u8>,
    pub stage: Stage,
}

/// Fully determined result of resolving one request.
#[derive(Debug)]
pub enum Outcome {
    ResolvedFile(ResolvedFile),
    ResolvedItem(Arc<Item>),
    NotFound { route: Route },
    Error(ResolveError),
}

impl Outcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::ResolvedFile(_) => "file",
            Outcome::ResolvedItem(_) => "item",
            Outcome::NotFound { .. } => "not_found",
            Outcome::Error(ResolveError::MalformedRoute(_)) => "malformed",
            Outcome::Error(ResolveError::ContentUnavailable { .. }) => "unavailable",
            Outcome::Error(ResolveError::Cancelled) => "cancelled",
        }
    }

    /// The stage that produced a successful outcome.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Outcome::ResolvedFile(resolved) => Some(resolved.stage),
            Outcome::ResolvedItem(_) => Some(Stage::Item),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::ResolvedFile(_) | Outcome::ResolvedItem(_))
    }
}
