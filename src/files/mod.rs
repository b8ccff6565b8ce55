//! Large-file scanning, searching and deletion.
//!
//! Everything here is synchronous and read-only apart from [`delete_files`].
//! Entries that cannot be listed or stat'ed are skipped, never reported as
//! failures of the whole operation.

mod delete;
mod scanner;
mod search;
mod walker;

use std::path::PathBuf;

use serde::Serialize;

pub use delete::delete_files;
pub use scanner::{top_k, DiskScanner};
pub use search::{FileSearch, SearchQuery};
pub use walker::PathWalker;

/// A regular file and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
}

impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;

    /// Write a file of exactly `size` bytes, creating parent directories.
    pub fn write_sized(root: &Path, rel: &str, size: usize) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'x'; size]).unwrap();
    }
}
