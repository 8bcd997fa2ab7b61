//! Generic exact-match index.

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::Routed;
use crate::index::IndexError;
use crate::route::Route;

/// Immutable mapping from [`Route`] to a shared entity.
#[derive(Debug)]
pub struct RouteIndex<T> {
    entries: HashMap<Route, Arc<T>>,
    /// All routes in `Route` order.
    sorted: Vec<Route>,
}

impl<T> Default for RouteIndex<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            sorted: Vec::new(),
        }
    }
}

impl<T: Routed> RouteIndex<T> {
    /// Build an index, failing on the first route claimed twice.
    pub fn build<I>(entities: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let mut entries = HashMap::new();
        for entity in entities {
            let route = entity.route().clone();
            if entries.contains_key(&route) {
                return Err(IndexError::DuplicateRoute { route });
            }
            entries.insert(route, entity);
        }

        let mut sorted: Vec<Route> = entries.keys().cloned().collect();
        sorted.sort();

        Ok(Self { entries, sorted })
    }

    /// Exact-route lookup.
    pub fn is_match(&self, route: &Route) -> Option<Arc<T>> {
        self.entries.get(route).cloned()
    }

    pub fn get(&self, route: &Route) -> Option<&Arc<T>> {
        self.entries.get(route)
    }

    pub fn contains(&self, route: &Route) -> bool {
        self.entries.contains_key(route)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every indexed route, parents before children.
    pub fn routes(&self) -> &[Route] {
        &self.sorted
    }

    /// Entities in route order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.sorted.iter().filter_map(move |r| self.entries.get(r))
    }

    /// Entities exactly one level below `parent`, in route order.
    pub fn children_of<'a>(&'a self, parent: &'a Route) -> impl Iterator<Item = &'a Arc<T>> + 'a {
        self.sorted
            .iter()
            .filter(move |r| r.is_direct_child_of(parent))
            .filter_map(move |r| self.entries.get(r))
    }

    /// All strict descendants of `ancestor`, in route order.
    pub fn descendants_of<'a>(&'a self, ancestor: &'a Route) -> impl Iterator<Item = &'a Arc<T>> + 'a {
        self.sorted
            .iter()
            .filter(move |r| r.is_child_of(ancestor))
            .filter_map(move |r| self.entries.get(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{File, MemoryContentProvider};

    fn file(raw: &str) -> Arc<File> {
        Arc::new(File::new(
            Route::parse(raw).unwrap(),
            Arc::new(MemoryContentProvider::new(raw)),
        ))
    }

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    #[test]
    fn test_is_match_returns_inserted_entity() {
        let favicon = file("theme/favicon.ico");
        let index = RouteIndex::build([favicon.clone(), file("theme/style.css")]).unwrap();

        let found = index.is_match(&route("Theme/favicon.ico/")).unwrap();
        assert!(Arc::ptr_eq(&found, &favicon));
        assert!(index.is_match(&route("theme/missing.css")).is_none());
        assert!(index.is_match(&route("theme")).is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_route_fails() {
        let err = RouteIndex::build([file("a/b"), file("A/B/")]).unwrap_err();
        assert_eq!(err, IndexError::DuplicateRoute { route: route("a/b") });
    }

    #[test]
    fn test_descendant_queries_are_ordered() {
        let index = RouteIndex::build([
            file("theme/js/app.js"),
            file("theme/b.css"),
            file("theme/a.css"),
            file("other/x"),
        ])
        .unwrap();
        let theme = route("theme");

        let children: Vec<_> = index.children_of(&theme).map(|f| f.route().to_string()).collect();
        assert_eq!(children, vec!["theme/a.css", "theme/b.css"]);

        let all: Vec<_> = index.descendants_of(&theme).map(|f| f.route().to_string()).collect();
        assert_eq!(all, vec!["theme/a.css", "theme/b.css", "theme/js/app.js"]);
    }

    #[test]
    fn test_empty_index() {
        let index: RouteIndex<File> = RouteIndex::default();
        assert!(index.is_empty());
        assert!(index.is_match(&Route::root()).is_none());
    }
}
