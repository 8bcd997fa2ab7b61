//! Immutable content snapshot and its swappable holder.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::index::{FileIndex, ItemIndex};
use crate::resolve::Resolver;
use crate::rewrite::RewriteSet;
use crate::route::Route;

/// Everything one request resolves against.
#[derive(Debug)]
pub struct ContentSnapshot {
    pub items: ItemIndex,
    pub files: FileIndex,
    pub rewrites: RewriteSet,
    /// Reserved prefix for theme files.
    pub theme_route: Route,
}

impl ContentSnapshot {
    pub fn new(items: ItemIndex, files: FileIndex, rewrites: RewriteSet, theme_route: Route) -> Self {
        Self {
            items,
            files,
            rewrites,
            theme_route,
        }
    }

    /// A snapshot with no content, used before the first scan completes.
    pub fn empty(theme_route: Route) -> Self {
        Self::new(
            ItemIndex::default(),
            FileIndex::default(),
            RewriteSet::default(),
            theme_route,
        )
    }
}

/// Holder for the active snapshot, replaced wholesale on rebuild.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<ContentSnapshot>,
    generation: AtomicU64,
}

impl SnapshotStore {
    pub fn new(snapshot: ContentSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
            generation: AtomicU64::new(1),
        }
    }

    /// Capture the active snapshot.
    pub fn load(&self) -> Arc<ContentSnapshot> {
        self.current.load_full()
    }

    /// A resolver bound to the active snapshot.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.load())
    }

    /// Swap in a new snapshot, returning its generation number.
    pub fn replace(&self, snapshot: ContentSnapshot) -> u64 {
        self.current.store(Arc::new(snapshot));
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Build a snapshot with `build` and swap it in only on success.
    pub fn rebuild_with<F, E>(&self, build: F) -> Result<u64, E>
    where
        F: FnOnce() -> Result<ContentSnapshot, E>,
    {
        let snapshot = build()?;
        Ok(self.replace(snapshot))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
