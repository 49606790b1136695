//! Document construction options

use std::path::{Path, PathBuf};

use crate::compression::CompressionMode;
use crate::error::{PdfError, Result};

/// Default piece size when copying the memory stream to a sink.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Settings applied when a [`Document`](crate::Document) is created.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// When set, every file the document reads or writes must resolve
    /// inside this directory.
    pub base_dir: Option<PathBuf>,
    /// Maximum kids per `/Pages` node; 0 keeps the page tree flat.
    pub pages_per_node: usize,
    pub compression: CompressionMode,
    /// Piece size for [`Document::output`](crate::Document::output).
    pub chunk_size: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            pages_per_node: 0,
            compression: CompressionMode::NONE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_pages_per_node(mut self, pages_per_node: usize) -> Self {
        self.pages_per_node = pages_per_node;
        self
    }

    pub fn with_compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    /// A zero chunk size falls back to the default.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        self
    }

    /// Checks `path` against `base_dir` and returns the path to open.
    ///
    /// Relative paths are taken relative to `base_dir`. The file itself
    /// need not exist yet, but its parent directory must.
    pub fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        let Some(base_dir) = &self.base_dir else {
            return Ok(path.to_path_buf());
        };

        let candidate = if path.is_relative() {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        };
        let canonical_base = canonicalize(base_dir)?;
        let resolved = match candidate.canonicalize() {
            Ok(resolved) => resolved,
            Err(_) => {
                let file_name = candidate
                    .file_name()
                    .ok_or_else(|| PdfError::PathNotAllowed(candidate.clone()))?;
                let parent = candidate.parent().unwrap_or(Path::new("."));
                canonicalize(parent)?.join(file_name)
            }
        };

        if !resolved.starts_with(&canonical_base) {
            return Err(PdfError::PathNotAllowed(path.to_path_buf()));
        }
        Ok(resolved)
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|source| PdfError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}
