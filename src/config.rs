use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{OptimizerError, Result};
use crate::reporter::{Reporter, SCHEDULE};

/// Default number of files kept by the large-file scan.
pub const DEFAULT_SCAN_LIMIT: usize = 50;

/// Samples kept per metric history series.
pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Free space on `/` below which the advisor complains: 5 GiB.
pub const DEFAULT_LOW_DISK_THRESHOLD: u64 = 5 * 1_073_741_824;

/// Longest tune-up interval the schedule accepts, in minutes.
pub const MAX_TUNEUP_INTERVAL: u64 = 1440;

/// Application configuration, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub home: PathBuf,
    pub app_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub schedule_path: PathBuf,
    pub temp_dirs: Vec<PathBuf>,
    pub cpu_sysfs_root: PathBuf,
    pub swappiness_path: PathBuf,
    pub drop_caches_path: PathBuf,
    pub thermal_root: PathBuf,
    pub history_size: usize,
    pub scan_limit: usize,
    pub low_disk_threshold: u64,
}

impl AppConfig {
    /// Build the configuration for the current user.
    pub fn discover() -> Result<Self> {
        let home = dirs::home_dir().ok_or(OptimizerError::HomeDirNotFound)?;
        Ok(Self::with_home(home))
    }

    /// Build the configuration rooted at an arbitrary home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let app_dir = home.join(".system_optimizer");
        Self {
            reports_dir: app_dir.join("reports"),
            schedule_path: app_dir.join("schedule.json"),
            temp_dirs: vec![PathBuf::from("/tmp"), home.join(".cache")],
            cpu_sysfs_root: PathBuf::from("/sys/devices/system/cpu"),
            swappiness_path: PathBuf::from("/proc/sys/vm/swappiness"),
            drop_caches_path: PathBuf::from("/proc/sys/vm/drop_caches"),
            thermal_root: PathBuf::from("/sys/class/thermal"),
            history_size: DEFAULT_HISTORY_SIZE,
            scan_limit: DEFAULT_SCAN_LIMIT,
            low_disk_threshold: DEFAULT_LOW_DISK_THRESHOLD,
            app_dir,
            home,
        }
    }

    /// Create the application and report directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.app_dir)?;
        std::fs::create_dir_all(&self.reports_dir)?;
        Ok(())
    }
}

/// Persisted schedule settings: a flat string-keyed JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleConfig {
    values: BTreeMap<String, Value>,
}

impl ScheduleConfig {
    /// Load from `path`. A missing or malformed file yields an empty config.
    pub fn load(path: &Path, reporter: &dyn Reporter) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                reporter.error(
                    SCHEDULE,
                    &format!("Cannot read schedule configuration {}: {e}", path.display()),
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, Value>>(&text) {
            Ok(values) => Self { values },
            Err(_) => {
                reporter.error(
                    SCHEDULE,
                    &format!("Invalid schedule configuration in {}", path.display()),
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path, reporter: &dyn Reporter) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json)?;
        reporter.info(
            SCHEDULE,
            &format!("Saved schedule configuration to {}", path.display()),
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn auto_cleanup(&self) -> bool {
        self.get("auto_cleanup")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn dark_mode(&self) -> bool {
        self.get("dark_mode").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Minutes between tune-ups; 0 disables. Out-of-range values read as 0.
    pub fn tuneup_interval(&self) -> u64 {
        self.get("tuneup_interval")
            .and_then(Value::as_u64)
            .filter(|m| *m <= MAX_TUNEUP_INTERVAL)
            .unwrap_or(0)
    }

    pub fn set_tuneup_interval(&mut self, minutes: u64) -> Result<()> {
        if minutes > MAX_TUNEUP_INTERVAL {
            return Err(OptimizerError::InvalidValue(format!(
                "tune-up interval must be at most {MAX_TUNEUP_INTERVAL} minutes, got {minutes}"
            )));
        }
        self.set("tuneup_interval", minutes);
        Ok(())
    }
}
