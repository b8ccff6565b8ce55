use std::path::{Path, PathBuf};

use crate::reporter::{SharedReporter, FILE_MANAGEMENT};

use super::{FileInfo, PathWalker};

/// Conjunctive filter for [`FileSearch`]. Unset or empty predicates match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    name: Option<String>,
    extension: Option<String>,
    min_size: u64,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring of the base name.
    pub fn name(mut self, name: impl AsRef<str>) -> Self {
        self.name = non_empty_lower(name.as_ref());
        self
    }

    /// Case-insensitive suffix of the base name, e.g. `.log`.
    pub fn extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = non_empty_lower(extension.as_ref());
        self
    }

    /// Inclusive lower bound on size in bytes.
    pub fn min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    fn matches_name(&self, base_name: &str) -> bool {
        let base = base_name.to_lowercase();
        if let Some(ref name) = self.name {
            if !base.contains(name.as_str()) {
                return false;
            }
        }
        if let Some(ref ext) = self.extension {
            if !base.ends_with(ext.as_str()) {
                return false;
            }
        }
        true
    }
}

fn non_empty_lower(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_lowercase())
    }
}

/// Linear search over every file below a root.
pub struct FileSearch {
    root: PathBuf,
    reporter: SharedReporter,
}

impl FileSearch {
    pub fn new(root: impl AsRef<Path>, reporter: SharedReporter) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            reporter,
        }
    }

    /// All files matching `query`, in traversal order.
    pub fn search(&self, query: &SearchQuery) -> Vec<FileInfo> {
        let matches: Vec<FileInfo> = PathWalker::new(&self.root)
            .walk()
            .filter(|path| {
                let base = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                query.matches_name(&base)
            })
            .filter_map(|path| {
                let size = std::fs::metadata(&path).ok()?.len();
                (size >= query.min_size).then_some(FileInfo { path, size })
            })
            .collect();

        self.reporter.info(
            FILE_MANAGEMENT,
            &format!("Found {} files for search criteria", matches.len()),
        );
        matches
    }
}
