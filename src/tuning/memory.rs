use std::path::{Path, PathBuf};

use crate::error::{OptimizerError, Result};
use crate::reporter::{SharedReporter, SYSTEM_TUNING};

/// Highest value the kernel accepts for vm.swappiness.
pub const MAX_SWAPPINESS: u32 = 200;

pub struct MemoryTuner {
    swappiness_path: PathBuf,
    drop_caches_path: PathBuf,
    reporter: SharedReporter,
}

impl MemoryTuner {
    pub fn new(
        swappiness_path: impl AsRef<Path>,
        drop_caches_path: impl AsRef<Path>,
        reporter: SharedReporter,
    ) -> Self {
        Self {
            swappiness_path: swappiness_path.as_ref().to_path_buf(),
            drop_caches_path: drop_caches_path.as_ref().to_path_buf(),
            reporter,
        }
    }

    pub fn swappiness(&self) -> Option<u32> {
        let value = std::fs::read_to_string(&self.swappiness_path)
            .ok()
            .and_then(|s| s.trim().parse().ok());
        if value.is_none() {
            self.reporter
                .error(SYSTEM_TUNING, "Unable to read swappiness value");
        }
        value
    }

    pub fn set_swappiness(&self, value: u32) -> Result<()> {
        if value > MAX_SWAPPINESS {
            return Err(OptimizerError::InvalidValue(format!(
                "swappiness must be between 0 and {MAX_SWAPPINESS}, got {value}"
            )));
        }
        std::fs::write(&self.swappiness_path, value.to_string()).map_err(|e| {
            self.reporter
                .error(SYSTEM_TUNING, &format!("Failed to set swappiness: {e}"));
            OptimizerError::from_io(e, &self.swappiness_path)
        })?;
        self.reporter
            .info(SYSTEM_TUNING, &format!("Swappiness set to {value}"));
        Ok(())
    }

    /// Drop the page cache, dentries and inodes.
    pub fn clear_cache(&self) -> Result<()> {
        std::fs::write(&self.drop_caches_path, "3\n").map_err(|e| {
            self.reporter
                .error(SYSTEM_TUNING, &format!("Failed to clear caches: {e}"));
            OptimizerError::from_io(e, &self.drop_caches_path)
        })?;
        self.reporter
            .info(SYSTEM_TUNING, "Cleared page cache, dentries, and inodes");
        Ok(())
    }
}
