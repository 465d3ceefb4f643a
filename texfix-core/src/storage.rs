use crate::error::{Result, RewriteError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Where documents are read from and written back to
pub trait DocumentStore {
    /// Read the whole document as UTF-8 text
    fn load(&self, path: &Path) -> Result<String>;
    /// Replace the document's content entirely
    fn save(&self, path: &Path, content: &str) -> Result<()>;

    /// Whether `save` actually reaches the document
    fn persists(&self) -> bool {
        true
    }
}

/// Filesystem store: UTF-8 read, truncating write, no backup
pub struct FileStore;

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self
    }
}

fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| RewriteError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

impl DocumentStore for FileStore {
    fn load(&self, path: &Path) -> Result<String> {
        read_utf8(path)
    }

    fn save(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content.as_bytes()).map_err(|source| RewriteError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads from disk like [`FileStore`] but never writes
pub struct DryRunStore;

impl Default for DryRunStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for DryRunStore {
    fn load(&self, path: &Path) -> Result<String> {
        read_utf8(path)
    }

    fn save(&self, _path: &Path, _content: &str) -> Result<()> {
        Ok(()) // No-op
    }

    fn persists(&self) -> bool {
        false
    }
}

/// Hex SHA-256 of document text
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
