//! Item index with attached-file lookup.
//!
//! # Responsibilities
//! - Exact item lookup by route
//! - Resolve routes that address a file attached to an indexed item
//!
//! # Design Decisions
//! - File lookup walks the request route's ancestors, deepest first,
//!   so the nearest owning item wins
//! - Attached files must be unique per item (checked at build time)

use std::collections::HashSet;
use std::sync::Arc;

use crate::content::{File, Item};
use crate::index::{IndexError, RouteIndex};
use crate::route::Route;

/// Index of content items.
#[derive(Debug, Default)]
pub struct ItemIndex {
    items: RouteIndex<Item>,
}

impl ItemIndex {
    /// Build from a flat list of items.
    pub fn build<I>(items: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Arc<Item>>,
    {
        let items = RouteIndex::build(items)?;

        for item in items.iter() {
            let mut seen = HashSet::new();
            for file in item.files() {
                if !seen.insert(file.route()) {
                    return Err(IndexError::DuplicateRoute {
                        route: file.route().clone(),
                    });
                }
            }
        }

        Ok(Self { items })
    }

    /// Build from the root of an item tree.
    pub fn from_tree(root: &Arc<Item>) -> Result<Self, IndexError> {
        Self::build(root.walk())
    }

    /// Exact-route item lookup.
    pub fn is_match(&self, route: &Route) -> Option<Arc<Item>> {
        self.items.is_match(route)
    }

    /// Lookup of a file attached to some indexed item.
    ///
    /// The route is read as `<item route>/<file path>`.
    pub fn is_file_match(&self, route: &Route) -> Option<Arc<File>> {
        route.ancestors().find_map(|candidate| {
            self.items
                .get(&candidate)
                .and_then(|item| item.file(route).cloned())
        })
    }

    /// The item at the empty route.
    pub fn root(&self) -> Option<Arc<Item>> {
        self.items.is_match(&Route::root())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of files attached across all items.
    pub fn file_count(&self) -> usize {
        self.items.iter().map(|item| item.files().len()).sum()
    }

    pub fn routes(&self) -> &[Route] {
        self.items.routes()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Item>> + '_ {
        self.items.iter()
    }

    pub fn children_of<'a>(&'a self, parent: &'a Route) -> impl Iterator<Item = &'a Arc<Item>> + 'a {
        self.items.children_of(parent)
    }

    pub fn descendants_of<'a>(&'a self, ancestor: &'a Route) -> impl Iterator<Item = &'a Arc<Item>> + 'a {
        self.items.descendants_of(ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ItemMetadata, MemoryContentProvider};

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    fn file(raw: &str) -> Arc<File> {
        Arc::new(File::new(route(raw), Arc::new(MemoryContentProvider::new(raw))))
    }

    fn item(raw: &str, files: Vec<Arc<File>>, children: Vec<Arc<Item>>) -> Arc<Item> {
        Arc::new(
            Item::new(
                route(raw),
                Arc::new(MemoryContentProvider::empty()),
                ItemMetadata::default(),
            )
            .with_files(files)
            .with_children(children),
        )
    }

    fn tree() -> Arc<Item> {
        let intro = item(
            "docs/intro",
            vec![file("docs/intro/diagram.png"), file("docs/intro/files/nested/a.txt")],
            vec![],
        );
        let docs = item("docs", vec![file("docs/shared.css")], vec![intro]);
        item("", vec![], vec![docs])
    }

    #[test]
    fn test_from_tree_indexes_every_item() {
        let index = ItemIndex::from_tree(&tree()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.file_count(), 3);
        assert!(index.root().is_some());
        assert!(index.is_match(&route("docs/intro")).is_some());
        assert!(index.is_match(&route("docs/intro/diagram.png")).is_none());
    }

    #[test]
    fn test_is_file_match_finds_attached_files() {
        let index = ItemIndex::from_tree(&tree()).unwrap();

        let diagram = index.is_file_match(&route("docs/intro/diagram.png")).unwrap();
        assert_eq!(diagram.route(), &route("docs/intro/diagram.png"));
        assert!(index.is_file_match(&route("docs/intro/files/nested/a.txt")).is_some());
        assert!(index.is_file_match(&route("docs/shared.css")).is_some());

        assert!(index.is_file_match(&route("docs/intro/missing.png")).is_none());
        assert!(index.is_file_match(&route("docs/intro")).is_none());
        assert!(index.is_file_match(&Route::root()).is_none());
    }

    #[test]
    fn test_duplicate_item_routes_fail() {
        let err = ItemIndex::build([item("a", vec![], vec![]), item("A", vec![], vec![])]).unwrap_err();
        assert_eq!(err, IndexError::DuplicateRoute { route: route("a") });
    }

    #[test]
    fn test_duplicate_attached_files_fail() {
        let dup = item("a", vec![file("a/x.png"), file("a/X.png")], vec![]);
        let err = ItemIndex::build([dup]).unwrap_err();
        assert_eq!(err, IndexError::DuplicateRoute { route: route("a/x.png") });
    }
}
