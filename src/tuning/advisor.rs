use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::disk_info;
use crate::reporter::{SharedReporter, SYSTEM_TUNING};

use super::MemoryTuner;

/// Kernel default; anything above swaps more eagerly.
const DEFAULT_SWAPPINESS: u32 = 60;

/// What the advisor looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemState {
    pub root_free_bytes: Option<u64>,
    pub swappiness: Option<u32>,
}

/// Derives plain-language recommendations from the system state.
pub struct Advisor {
    root: PathBuf,
    low_disk_threshold: u64,
    memory: MemoryTuner,
    reporter: SharedReporter,
}

impl Advisor {
    pub fn new(config: &AppConfig, reporter: SharedReporter) -> Self {
        Self {
            root: PathBuf::from("/"),
            low_disk_threshold: config.low_disk_threshold,
            memory: MemoryTuner::new(
                &config.swappiness_path,
                &config.drop_caches_path,
                reporter.clone(),
            ),
            reporter,
        }
    }

    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = root.to_path_buf();
        self
    }

    pub fn current_state(&self) -> SystemState {
        SystemState {
            root_free_bytes: disk_info::get_disk_info(&self.root).map(|d| d.available),
            swappiness: self.memory.swappiness(),
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let recs = recommend(&self.current_state(), self.low_disk_threshold);
        self.reporter.info(
            SYSTEM_TUNING,
            &format!("Generated {} recommendations", recs.len()),
        );
        recs
    }
}

pub fn recommend(state: &SystemState, low_disk_threshold: u64) -> Vec<String> {
    let mut recs = Vec::new();
    if matches!(state.root_free_bytes, Some(free) if free < low_disk_threshold) {
        recs.push("Low disk space detected on root partition".to_string());
    }
    if let Some(swappiness) = state.swappiness.filter(|s| *s > DEFAULT_SWAPPINESS) {
        recs.push(format!(
            "High swappiness ({swappiness}) may cause excessive swapping"
        ));
    }
    if recs.is_empty() {
        recs.push("System is running optimally".to_string());
    }
    recs
}
