use std::path::PathBuf;

use rayon::prelude::*;

use crate::reporter::{SharedReporter, SYSTEM_TUNING};
use crate::utils;

/// One top-level item inside a temp directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Outcome of a temp scan or clean.
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub entries: Vec<CleanupEntry>,
    pub total_bytes: u64,
    pub errors: Vec<String>,
}

/// Removes the contents of the configured temp directories.
pub struct TempCleaner {
    temp_dirs: Vec<PathBuf>,
    reporter: SharedReporter,
}

impl TempCleaner {
    pub fn new(temp_dirs: Vec<PathBuf>, reporter: SharedReporter) -> Self {
        Self {
            temp_dirs,
            reporter,
        }
    }

    /// List what would be removed. Never deletes anything.
    pub fn scan(&self) -> CleanupResult {
        let mut entries = Vec::new();
        let mut total_bytes = 0u64;
        let mut errors = Vec::new();

        for temp_dir in &self.temp_dirs {
            if !temp_dir.exists() {
                continue;
            }
            match std::fs::read_dir(temp_dir) {
                Ok(read_dir) => {
                    let mut children: Vec<PathBuf> =
                        read_dir.flatten().map(|entry| entry.path()).collect();
                    children.sort();
                    for path in children {
                        let size = utils::entry_size(&path);
                        total_bytes += size;
                        entries.push(CleanupEntry {
                            path,
                            size_bytes: size,
                        });
                    }
                }
                Err(e) => {
                    errors.push(format!("Cannot read {}: {e}", temp_dir.display()));
                }
            }
        }

        CleanupResult {
            entries,
            total_bytes,
            errors,
        }
    }

    /// Remove every scanned entry unless `dry_run`. Each removal is
    /// independent; failures are recorded and the rest carry on.
    pub fn clean(&self, dry_run: bool) -> CleanupResult {
        let mut result = self.scan();
        if dry_run {
            return result;
        }

        let outcomes: Vec<_> = std::mem::take(&mut result.entries)
            .into_par_iter()
            .map(|entry| {
                let outcome = utils::safe_remove(&entry.path);
                (entry, outcome)
            })
            .collect();

        let mut total_freed = 0u64;
        for (entry, outcome) in outcomes {
            match outcome {
                Ok(freed) => {
                    self.reporter.info(
                        SYSTEM_TUNING,
                        &format!("Removed temporary file {}", entry.path.display()),
                    );
                    total_freed += freed;
                    result.entries.push(entry);
                }
                Err(e) => {
                    let msg = format!("Failed to remove {}: {e}", entry.path.display());
                    self.reporter.error(SYSTEM_TUNING, &msg);
                    result.errors.push(msg);
                }
            }
        }

        result.total_bytes = total_freed;
        result
    }
}
