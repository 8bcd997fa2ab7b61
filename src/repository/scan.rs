//! Filesystem repository scanner.
//!
//! # Layout
//! - A directory holding at least one `*.md` file is an item; the first
//!   Markdown file in name order is its content
//! - The repository root is always an item
//! - Any other non-hidden file below an item directory is attached to the
//!   nearest item, routed as `<item route>/<relative path>`
//! - Theme files are routed as `<theme route>/<relative path>`
//!
//! # Design Decisions
//! - Entries are visited in name order so builds are reproducible
//! - Hidden entries (leading `.`) are skipped
//! - Only metadata is read eagerly; file bytes stay on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::ServerConfig;
use crate::content::{
    ContentProvider, File, FileContentProvider, Item, ItemMetadata, ItemType, MemoryContentProvider,
};
use crate::index::{FileIndex, IndexError, ItemIndex};
use crate::repository::ContentSnapshot;
use crate::rewrite::{RewriteError, RewriteSet};
use crate::route::{Route, RouteError};

/// Error type for repository scanning and snapshot building.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to scan {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

impl ScanError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Scan the configured repository and theme into a fresh snapshot.
pub fn build_snapshot(config: &ServerConfig) -> Result<ContentSnapshot, ScanError> {
    let start = Instant::now();
    let repository = &config.repository;

    let root = scan_repository(&repository.path)?;
    let items = ItemIndex::from_tree(&root)?;

    let theme_route = Route::parse(&repository.theme_route)?;
    let theme_files = match &repository.theme_dir {
        Some(dir) if dir.is_dir() => scan_theme(dir, &theme_route)?,
        Some(dir) => {
            tracing::warn!(path = ?dir, "Theme directory not found, serving without theme files");
            Vec::new()
        }
        None => Vec::new(),
    };
    let files = FileIndex::build(theme_files)?;

    let rewrites = RewriteSet::from_config(&config.rewrites)?;

    tracing::info!(
        path = ?repository.path,
        items = items.len(),
        item_files = items.file_count(),
        theme_files = files.len(),
        rewrites = rewrites.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Repository indexed"
    );

    Ok(ContentSnapshot::new(items, files, rewrites, theme_route))
}

/// Scan a repository directory into an item tree rooted at the empty route.
pub fn scan_repository(root: &Path) -> Result<Arc<Item>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    scan_item(root, Route::root())
}

/// Scan a theme directory into files below `theme_route`.
pub fn scan_theme(dir: &Path, theme_route: &Route) -> Result<Vec<Arc<File>>, ScanError> {
    let mut files = Vec::new();
    let mut stack = vec![(dir.to_path_buf(), theme_route.clone())];

    while let Some((dir, route)) = stack.pop() {
        for entry in read_entries(&dir)? {
            let entry_route = route.join(&entry.name)?;
            if entry.is_dir {
                stack.push((entry.path, entry_route));
            } else {
                files.push(new_file(entry_route, entry.path));
            }
        }
    }

    Ok(files)
}

fn scan_item(dir: &Path, route: Route) -> Result<Arc<Item>, ScanError> {
    let entries = read_entries(dir)?;
    let markdown = entries.iter().find(|e| !e.is_dir && is_markdown(&e.path));

    let provider: Arc<dyn ContentProvider> = match markdown {
        Some(entry) => Arc::new(FileContentProvider::new(&entry.path)),
        None => Arc::new(MemoryContentProvider::empty()),
    };
    let metadata = item_metadata(dir, &route, markdown.map(|e| e.path.as_path()))?;

    let mut children = Vec::new();
    let mut files = Vec::new();
    for entry in &entries {
        if markdown.is_some_and(|m| m.path == entry.path) {
            continue;
        }
        let entry_route = route.join(&entry.name)?;
        if entry.is_dir {
            collect(&entry.path, entry_route, &mut children, &mut files)?;
        } else {
            files.push(new_file(entry_route, entry.path.clone()));
        }
    }

    tracing::trace!(route = %route, children = children.len(), files = files.len(), "Item scanned");

    Ok(Arc::new(
        Item::new(route, provider, metadata)
            .with_children(children)
            .with_files(files),
    ))
}

/// Either a child item (directory with Markdown) or more attached files.
fn collect(
    dir: &Path,
    route: Route,
    children: &mut Vec<Arc<Item>>,
    files: &mut Vec<Arc<File>>,
) -> Result<(), ScanError> {
    let entries = read_entries(dir)?;
    if entries.iter().any(|e| !e.is_dir && is_markdown(&e.path)) {
        children.push(scan_item(dir, route)?);
        return Ok(());
    }

    for entry in entries {
        let entry_route = route.join(&entry.name)?;
        if entry.is_dir {
            collect(&entry.path, entry_route, children, files)?;
        } else {
            files.push(new_file(entry_route, entry.path));
        }
    }
    Ok(())
}

fn read_entries(dir: &Path) -> Result<Vec<Entry>, ScanError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))? {
        let entry = entry.map_err(|e| ScanError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        entries.push(Entry {
            is_dir: path.is_dir(),
            name,
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn new_file(route: Route, path: PathBuf) -> Arc<File> {
    Arc::new(File::new(route, Arc::new(FileContentProvider::new(path))))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn item_metadata(dir: &Path, route: &Route, markdown: Option<&Path>) -> Result<ItemMetadata, ScanError> {
    let source = markdown.unwrap_or(dir);
    let fs_meta = fs::metadata(source).map_err(|e| ScanError::io(source, e))?;

    let heading = match markdown {
        Some(path) => {
            let bytes = fs::read(path).map_err(|e| ScanError::io(path, e))?;
            first_heading(&String::from_utf8_lossy(&bytes))
        }
        None => None,
    };

    let title = heading
        .or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .filter(|n| !n.is_empty())
        })
        .unwrap_or_else(|| "Home".to_string());

    Ok(ItemMetadata {
        title,
        item_type: if route.is_root() {
            ItemType::Repository
        } else {
            ItemType::Document
        },
        created: fs_meta.created().ok(),
        modified: fs_meta.modified().ok(),
    })
}

/// Text of the first level-one Markdown heading.
fn first_heading(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(first_heading("intro\n# Title \nmore"), Some("Title".into()));
        assert_eq!(first_heading("## Sub\ntext"), None);
        assert_eq!(first_heading("#   \n"), None);
    }

    #[test]
    fn test_scan_builds_item_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "readme.md", "# Welcome\n");
        write(root, "docs/docs.md", "# Docs\n");
        write(root, "docs/Intro/intro.md", "# Introduction\n");
        write(root, "docs/Intro/diagram.png", "png");
        write(root, "docs/Intro/files/nested/data.csv", "a,b");
        write(root, "docs/Intro/.hidden", "x");
        write(root, "assets/plain/notes/sub.md", "# Deep\n");

        let tree = scan_repository(root).unwrap();
        assert_eq!(tree.title(), "Welcome");
        assert_eq!(tree.item_type(), ItemType::Repository);

        let index = ItemIndex::from_tree(&tree).unwrap();
        let routes: Vec<_> = index.routes().iter().map(Route::to_string).collect();
        assert_eq!(routes, vec!["", "assets/plain/notes", "docs", "docs/intro"]);

        let intro = index.is_match(&route("docs/intro")).unwrap();
        assert_eq!(intro.title(), "Introduction");
        assert_eq!(intro.item_type(), ItemType::Document);
        let files: Vec<_> = intro.files().iter().map(|f| f.route().to_string()).collect();
        assert_eq!(files, vec!["docs/intro/diagram.png", "docs/intro/files/nested/data.csv"]);

        let png = index.is_file_match(&route("docs/intro/diagram.png")).unwrap();
        assert_eq!(png.data().unwrap(), b"png");
    }

    #[test]
    fn test_root_without_markdown_is_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "logo.svg", "<svg/>");

        let tree = scan_repository(dir.path()).unwrap();
        assert!(tree.route().is_root());
        assert!(tree.data().unwrap().is_empty());
        assert_eq!(tree.files().len(), 1);
    }

    #[test]
    fn test_case_colliding_files_fail_the_build() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        write(dir.path(), "Logo.png", "a");
        write(dir.path(), "logo.png", "b");

        let config = config_for(dir.path(), None);
        // Case-sensitive filesystems hold both files; insensitive ones only one.
        let entries = fs::read_dir(dir.path()).unwrap().count();
        match build_snapshot(&config) {
            Err(ScanError::Index(IndexError::DuplicateRoute { route: r })) => {
                assert_eq!(entries, 3);
                assert_eq!(r, route("logo.png"));
            }
            Ok(_) => assert_eq!(entries, 2),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_build_snapshot_with_theme() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        let theme = dir.path().join("theme");
        write(&content, "index.md", "# Home\n");
        write(&theme, "favicon.ico", "ico");
        write(&theme, "css/site.css", "body{}");

        let mut config = config_for(&content, Some(theme));
        config.rewrites.push(RewriteConfig::new("^robots.txt", "theme/robots.txt"));

        let snapshot = build_snapshot(&config).unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.files.len(), 2);
        assert_eq!(snapshot.rewrites.len(), 2);
        assert!(snapshot.files.is_match(&route("theme/css/site.css")).is_some());
        assert_eq!(snapshot.theme_route, route("theme"));
    }

    #[test]
    fn test_missing_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_repository(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    fn config_for(path: &Path, theme: Option<PathBuf>) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.repository.path = path.to_path_buf();
        config.repository.theme_dir = theme;
        config
    }
}
