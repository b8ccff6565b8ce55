use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Lazily enumerates every regular file below a root directory.
///
/// Each call to [`PathWalker::walk`] starts a fresh traversal. Symlinks are
/// not followed. A missing root and unreadable directories simply contribute
/// no paths.
pub struct PathWalker {
    root: PathBuf,
}

impl PathWalker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn walk(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
    }
}
