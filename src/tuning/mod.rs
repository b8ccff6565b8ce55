//! OS-level tuning actions.
//!
//! Every action goes through [`apply`], which matches exhaustively on
//! [`TuneAction`].

mod advisor;
mod cpu;
mod memory;
mod packages;
mod temp;

use std::fmt;

pub use advisor::{recommend, Advisor, SystemState};
pub use cpu::CpuTuner;
pub use memory::{MemoryTuner, MAX_SWAPPINESS};
pub use packages::PackageCache;
pub use temp::{CleanupEntry, CleanupResult, TempCleaner};

use crate::config::{AppConfig, ScheduleConfig};
use crate::error::Result;
use crate::reporter::{SharedReporter, SCHEDULE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuneAction {
    SetGovernor(String),
    SetSwappiness(u32),
    DropCaches,
    CleanTemp { dry_run: bool },
    CleanPackageCache,
}

#[derive(Debug)]
pub enum TuneOutcome {
    GovernorSet { governor: String, cpus: usize },
    SwappinessSet(u32),
    CachesDropped,
    TempCleaned { dry_run: bool, result: CleanupResult },
    PackageCacheCleaned,
}

impl fmt::Display for TuneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuneOutcome::GovernorSet { governor, cpus } => {
                write!(f, "CPU governor changed to {governor} on {cpus} CPU(s)")
            }
            TuneOutcome::SwappinessSet(value) => write!(f, "Swappiness set to {value}"),
            TuneOutcome::CachesDropped => write!(f, "Cleared cache"),
            TuneOutcome::TempCleaned { dry_run: true, result } => write!(
                f,
                "Would remove {} temporary entries",
                result.entries.len()
            ),
            TuneOutcome::TempCleaned { dry_run: false, result } => {
                write!(f, "Removed {} temporary entries", result.entries.len())
            }
            TuneOutcome::PackageCacheCleaned => write!(f, "Cleaned package cache"),
        }
    }
}

pub fn apply(
    action: &TuneAction,
    config: &AppConfig,
    reporter: &SharedReporter,
) -> Result<TuneOutcome> {
    match action {
        TuneAction::SetGovernor(governor) => {
            let cpus = CpuTuner::new(&config.cpu_sysfs_root, reporter.clone())
                .set_governor(governor)?;
            Ok(TuneOutcome::GovernorSet {
                governor: governor.trim().to_string(),
                cpus,
            })
        }
        TuneAction::SetSwappiness(value) => {
            memory_tuner(config, reporter).set_swappiness(*value)?;
            Ok(TuneOutcome::SwappinessSet(*value))
        }
        TuneAction::DropCaches => {
            memory_tuner(config, reporter).clear_cache()?;
            Ok(TuneOutcome::CachesDropped)
        }
        TuneAction::CleanTemp { dry_run } => {
            let result =
                TempCleaner::new(config.temp_dirs.clone(), reporter.clone()).clean(*dry_run);
            Ok(TuneOutcome::TempCleaned {
                dry_run: *dry_run,
                result,
            })
        }
        TuneAction::CleanPackageCache => {
            PackageCache::new(reporter.clone()).clean()?;
            Ok(TuneOutcome::PackageCacheCleaned)
        }
    }
}

fn memory_tuner(config: &AppConfig, reporter: &SharedReporter) -> MemoryTuner {
    MemoryTuner::new(
        &config.swappiness_path,
        &config.drop_caches_path,
        reporter.clone(),
    )
}

/// Actions a schedule enables, in execution order.
pub fn scheduled_actions(schedule: &ScheduleConfig) -> Vec<TuneAction> {
    let mut actions = Vec::new();
    if schedule.auto_cleanup() {
        actions.push(TuneAction::CleanTemp { dry_run: false });
    }
    actions
}

/// Run the scheduled tasks once. A failing task is logged and skipped.
pub fn run_scheduled(
    schedule: &ScheduleConfig,
    config: &AppConfig,
    reporter: &SharedReporter,
) -> Vec<TuneOutcome> {
    let mut outcomes = Vec::new();
    for action in scheduled_actions(schedule) {
        match apply(&action, config, reporter) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => reporter.error(SCHEDULE, &format!("Scheduled task {action:?} failed: {e}")),
        }
    }
    reporter.info(SCHEDULE, "Executed scheduled tasks");
    outcomes
}
