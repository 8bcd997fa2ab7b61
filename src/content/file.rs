//! Routed raw file.

use std::fmt;
use std::sync::Arc;

use crate::content::{ContentError, ContentProvider, Routed};
use crate::route::Route;

/// A routable raw-content record (no metadata).
#[derive(Debug, Clone)]
pub struct File {
    route: Route,
    provider: Arc<dyn ContentProvider>,
}

impl File {
    pub fn new(route: Route, provider: Arc<dyn ContentProvider>) -> Self {
        Self { route, provider }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn provider(&self) -> &Arc<dyn ContentProvider> {
        &self.provider
    }

    pub fn data(&self) -> Result<Vec<u8>, ContentError> {
        self.provider.data()
    }

    pub fn hash(&self) -> Result<String, ContentError> {
        self.provider.hash()
    }
}

impl Routed for File {
    fn route(&self) -> &Route {
        &self.route
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route)
    }
}
