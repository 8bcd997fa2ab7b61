//! Content provider capability.
//!
//! # Responsibilities
//! - Supply the raw bytes of a routed resource on demand
//! - Supply a content hash for change detection and cache validation
//!
//! # Design Decisions
//! - Lazy: nothing is read until `data()` or `hash()` is called
//! - Hash is the hex blake3 digest of the current bytes
//! - Read failures are reported, never converted into empty content

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for content access.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content unavailable: {0}")]
    Unavailable(String),
}

/// Lazy source of bytes and a content hash for one resource.
pub trait ContentProvider: Send + Sync + fmt::Debug {
    /// Raw bytes of the resource.
    ///
    /// Repeated calls for an unmodified resource return identical bytes.
    fn data(&self) -> Result<Vec<u8>, ContentError>;

    /// Hash of the current content.
    fn hash(&self) -> Result<String, ContentError> {
        self.data().map(|bytes| content_hash(&bytes))
    }
}

/// Hex-encoded blake3 digest.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(blake3::hash(bytes).as_bytes())
}

/// Reads a file from disk every time it is asked.
#[derive(Debug, Clone)]
pub struct FileContentProvider {
    path: PathBuf,
}

impl FileContentProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentProvider for FileContentProvider {
    fn data(&self) -> Result<Vec<u8>, ContentError> {
        std::fs::read(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Fixed in-memory content.
#[derive(Clone, Default)]
pub struct MemoryContentProvider {
    bytes: Vec<u8>,
}

impl MemoryContentProvider {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryContentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryContentProvider")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ContentProvider for MemoryContentProvider {
    fn data(&self) -> Result<Vec<u8>, ContentError> {
        Ok(self.bytes.clone())
    }
}
