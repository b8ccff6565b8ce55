use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::path::{Path, PathBuf};

use crate::reporter::{SharedReporter, FILE_MANAGEMENT};

use super::{FileInfo, PathWalker};

/// Finds the largest files below a root directory.
pub struct DiskScanner {
    root: PathBuf,
    max_results: usize,
    reporter: SharedReporter,
}

impl DiskScanner {
    pub fn new(root: impl AsRef<Path>, max_results: usize, reporter: SharedReporter) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_results,
            reporter,
        }
    }

    /// The `max_results` largest files, biggest first. Files that vanish or
    /// cannot be stat'ed between listing and stat are left out.
    pub fn scan(&self) -> Vec<FileInfo> {
        if self.max_results == 0 {
            return Vec::new();
        }

        let candidates = PathWalker::new(&self.root).walk().filter_map(|path| {
            let size = std::fs::metadata(&path).ok()?.len();
            Some(FileInfo { path, size })
        });
        let results = top_k(candidates, self.max_results);

        self.reporter.info(
            FILE_MANAGEMENT,
            &format!("Identified {} large files", results.len()),
        );
        results
    }
}

/// Heap slot. Orders by size, then by reversed path so that among equal
/// sizes the lexicographically greater path is the first to be evicted.
#[derive(PartialEq, Eq)]
struct Candidate(FileInfo);

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .size
            .cmp(&other.0.size)
            .then_with(|| other.0.path.cmp(&self.0.path))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keep the `k` largest entries of `candidates` using a bounded min-heap.
///
/// Never holds more than `k + 1` entries. Output is sorted by size
/// descending, ties broken by path ascending.
pub fn top_k<I>(candidates: I, k: usize) -> Vec<FileInfo>
where
    I: IntoIterator<Item = FileInfo>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k + 1);
    for info in candidates {
        heap.push(Reverse(Candidate(info)));
        if heap.len() > k {
            heap.pop();
        }
    }

    // ascending over Reverse is descending over Candidate
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(Candidate(info))| info)
        .collect()
}
