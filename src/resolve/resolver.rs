//! Staged request resolver.
//!
//! # Responsibilities
//! - Parse the request path into a route
//! - Run the stages in priority order against one snapshot
//! - Read matched file bytes and report unreadable content distinctly
//!
//! # Design Decisions
//! - Holds a single `Arc<ContentSnapshot>` for its whole lifetime, so a
//!   concurrent rebuild never changes what an in-flight request sees
//! - No locks; every structure touched is immutable

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::content::File;
use crate::repository::ContentSnapshot;
use crate::resolve::{Outcome, ResolveError, ResolvedFile, Stage};
use crate::route::Route;

/// Resolves request paths against one content snapshot.
#[derive(Debug, Clone)]
pub struct Resolver {
    snapshot: Arc<ContentSnapshot>,
}

impl Resolver {
    pub fn new(snapshot: Arc<ContentSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<ContentSnapshot> {
        &self.snapshot
    }

    /// Resolve a raw request path.
    pub fn resolve(&self, request_path: &str) -> Outcome {
        self.resolve_with_cancel(request_path, &CancellationToken::new())
    }

    /// Resolve a raw request path, aborting if `cancel` fires.
    pub fn resolve_with_cancel(&self, request_path: &str, cancel: &CancellationToken) -> Outcome {
        match Route::from_request_path(request_path) {
            Ok(route) => self.resolve_route_with_cancel(&route, cancel),
            Err(e) => {
                tracing::debug!(path = %request_path, error = %e, "Malformed request path");
                Outcome::Error(e.into())
            }
        }
    }

    pub fn resolve_route(&self, route: &Route) -> Outcome {
        self.resolve_route_with_cancel(route, &CancellationToken::new())
    }

    pub fn resolve_route_with_cancel(&self, route: &Route, cancel: &CancellationToken) -> Outcome {
        for stage in Stage::ORDER {
            if cancel.is_cancelled() {
                tracing::debug!(route = %route, stage = %stage, "Resolution cancelled");
                return Outcome::Error(ResolveError::Cancelled);
            }
            if let Some(outcome) = self.run_stage(stage, route, cancel) {
                tracing::debug!(route = %route, stage = %stage, outcome = outcome.kind(), "Request resolved");
                return outcome;
            }
        }

        tracing::debug!(route = %route, "No stage matched");
        Outcome::NotFound {
            route: route.clone(),
        }
    }

    /// Run a single stage; `None` means fall through to the next one.
    pub fn run_stage(&self, stage: Stage, route: &Route, cancel: &CancellationToken) -> Option<Outcome> {
        match stage {
            Stage::Theme => self.check_theme(route, cancel),
            Stage::Item => self.check_item(route),
            Stage::ItemFile => self.check_item_file(route, cancel),
            Stage::Rewrite => self.check_rewrites(route, cancel),
        }
    }

    fn check_theme(&self, route: &Route, cancel: &CancellationToken) -> Option<Outcome> {
        if !route.is_child_of(&self.snapshot.theme_route) {
            return None;
        }
        let file = self.snapshot.files.is_match(route)?;
        Some(read_file(route, file, Stage::Theme, cancel))
    }

    fn check_item(&self, route: &Route) -> Option<Outcome> {
        self.snapshot.items.is_match(route).map(Outcome::ResolvedItem)
    }

    fn check_item_file(&self, route: &Route, cancel: &CancellationToken) -> Option<Outcome> {
        let file = self.snapshot.items.is_file_match(route)?;
        Some(read_file(route, file, Stage::ItemFile, cancel))
    }

    fn check_rewrites(&self, route: &Route, cancel: &CancellationToken) -> Option<Outcome> {
        let file = self.snapshot.rewrites.matches(route).find_map(|target| {
            let found = self.snapshot.files.is_match(target);
            if found.is_none() {
                tracing::debug!(route = %route, target = %target, "Rewrite target missing, trying next rule");
            }
            found
        })?;
        Some(read_file(route, file, Stage::Rewrite, cancel))
    }
}

fn read_file(route: &Route, file: Arc<File>, stage: Stage, cancel: &CancellationToken) -> Outcome {
    if cancel.is_cancelled() {
        return Outcome::Error(ResolveError::Cancelled);
    }

    match file.data() {
        Ok(data) => Outcome::ResolvedFile(ResolvedFile {
            route: route.clone(),
            file,
            data,
            stage,
        }),
        Err(source) => {
            tracing::warn!(route = %route, file = %file.route(), error = %source, "Matched file is unreadable");
            Outcome::Error(ResolveError::ContentUnavailable {
                route: file.route().clone(),
                source,
            })
        }
    }
}
