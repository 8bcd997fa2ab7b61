//! Routed content item.
//!
//! # Responsibilities
//! - Hold the item's route, content provider and metadata
//! - Own the child items and attached files (tree structure)
//!
//! # Invariants
//! - Every child route is a strict descendant of the item route
//! - Every attached file route is a strict descendant of the item route

use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;

use crate::content::{ContentError, ContentProvider, File, Routed};
use crate::route::Route;

/// Kind of item, consumed by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// The tree root.
    Repository,
    #[default]
    Document,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Repository => "repository",
            ItemType::Document => "document",
        }
    }
}

/// Metadata attached to an item; opaque to resolution.
#[derive(Debug, Clone, Default)]
pub struct ItemMetadata {
    pub title: String,
    pub item_type: ItemType,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

/// A routable content record with metadata, children and files.
#[derive(Debug, Clone)]
pub struct Item {
    route: Route,
    provider: Arc<dyn ContentProvider>,
    metadata: ItemMetadata,
    children: Vec<Arc<Item>>,
    files: Vec<Arc<File>>,
}

impl Item {
    pub fn new(route: Route, provider: Arc<dyn ContentProvider>, metadata: ItemMetadata) -> Self {
        Self {
            route,
            provider,
            metadata,
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Attach child items. Children outside this item's subtree are dropped.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Arc<Item>>) -> Self {
        let route = &self.route;
        let (inside, outside): (Vec<_>, Vec<_>) =
            children.into_iter().partition(|c| c.route.is_child_of(route));
        for child in outside {
            tracing::warn!(item = %self.route, child = %child.route, "Ignoring child outside item subtree");
        }
        self.children.extend(inside);
        self.children.sort_by(|a, b| a.route.cmp(&b.route));
        self
    }

    /// Attach files. Files outside this item's subtree are dropped.
    pub fn with_files(mut self, files: impl IntoIterator<Item = Arc<File>>) -> Self {
        for file in files {
            if file.route().is_child_of(&self.route) {
                self.files.push(file);
            } else {
                tracing::warn!(item = %self.route, file = %file.route(), "Ignoring file outside item subtree");
            }
        }
        self.files.sort_by(|a, b| a.route().cmp(b.route()));
        self
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

    pub fn metadata(&self) -> &ItemMetadata {
        &self.metadata
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn item_type(&self) -> ItemType {
        self.metadata.item_type
    }

    pub fn children(&self) -> &[Arc<Item>] {
        &self.children
    }

    pub fn files(&self) -> &[Arc<File>] {
        &self.files
    }

    /// Attached file with exactly this route.
    pub fn file(&self, route: &Route) -> Option<&Arc<File>> {
        self.files.iter().find(|f| f.route() == route)
    }

    /// Depth-first iterator over this item and all descendants.
    pub fn walk(self: &Arc<Self>) -> Vec<Arc<Item>> {
        let mut out = Vec::new();
        let mut stack = vec![Arc::clone(self)];
        while let Some(item) = stack.pop() {
            stack.extend(item.children.iter().rev().cloned());
            out.push(item);
        }
        out
    }
}

impl Routed for Item {
    fn route(&self) -> &Route {
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryContentProvider;

    fn item(raw: &str) -> Item {
        Item::new(
            Route::parse(raw).unwrap(),
            Arc::new(MemoryContentProvider::empty()),
            ItemMetadata::default(),
        )
    }

    fn file(raw: &str) -> Arc<File> {
        Arc::new(File::new(
            Route::parse(raw).unwrap(),
            Arc::new(MemoryContentProvider::new(raw)),
        ))
    }

    #[test]
    fn test_children_must_be_descendants() {
        let parent = item("docs").with_children([
            Arc::new(item("docs/b")),
            Arc::new(item("other")),
            Arc::new(item("docs/a")),
        ]);
        let routes: Vec<_> = parent.children().iter().map(|c| c.route().as_str()).collect();
        assert_eq!(routes, vec!["docs/a", "docs/b"]);
    }

    #[test]
    fn test_file_lookup() {
        let intro = item("docs/intro").with_files([file("docs/intro/diagram.png"), file("elsewhere.png")]);
        assert_eq!(intro.files().len(), 1);
        assert!(intro.file(&Route::parse("docs/intro/diagram.png").unwrap()).is_some());
        assert!(intro.file(&Route::parse("docs/intro/other.png").unwrap()).is_none());
    }

    #[test]
    fn test_walk_is_depth_first() {
        let root = Arc::new(item("").with_children([
            Arc::new(item("a").with_children([Arc::new(item("a/x"))])),
            Arc::new(item("b")),
        ]));
        let order: Vec<_> = root.walk().iter().map(|i| i.route().to_string()).collect();
        assert_eq!(order, vec!["", "a", "a/x", "b"]);
    }
}
