//! Where content resources are fetched from.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};

/// Errors returned by a [`ContentSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource path escapes content root: {0}")]
    OutsideRoot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of raw content bytes, addressed by resource path.
pub trait ContentSource: Send + Sync {
    /// Fetch the bytes stored at `path`.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Reads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a resource path under the root, rejecting absolute paths and `..`.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SourceError::OutsideRoot(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ContentSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(full.display().to_string()))
            }
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}

/// Serves resources from memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous one at the same path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl ContentSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}
