use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{OptimizerError, Result};
use crate::reporter::{SharedReporter, SYSTEM_TUNING};

/// Reads and writes the cpufreq scaling governor through sysfs.
pub struct CpuTuner {
    sysfs_root: PathBuf,
    reporter: SharedReporter,
}

impl CpuTuner {
    pub fn new(sysfs_root: impl AsRef<Path>, reporter: SharedReporter) -> Self {
        Self {
            sysfs_root: sysfs_root.as_ref().to_path_buf(),
            reporter,
        }
    }

    /// `cpuN` directories in numeric order.
    fn cpu_dirs(&self) -> Vec<PathBuf> {
        let Ok(read_dir) = std::fs::read_dir(&self.sysfs_root) else {
            return vec![];
        };
        let mut cpus: Vec<(u32, PathBuf)> = read_dir
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                let index = name.strip_prefix("cpu")?.parse::<u32>().ok()?;
                Some((index, e.path()))
            })
            .collect();
        cpus.sort();
        cpus.into_iter().map(|(_, path)| path).collect()
    }

    fn cpufreq_files(&self, name: &str) -> Vec<PathBuf> {
        self.cpu_dirs()
            .into_iter()
            .map(|cpu| cpu.join("cpufreq").join(name))
            .filter(|path| path.exists())
            .collect()
    }

    /// Union of the governors every CPU advertises, sorted.
    pub fn available_governors(&self) -> Vec<String> {
        let mut governors = BTreeSet::new();
        for path in self.cpufreq_files("scaling_available_governors") {
            if let Ok(content) = std::fs::read_to_string(&path) {
                governors.extend(content.split_whitespace().map(str::to_string));
            }
        }
        governors.into_iter().collect()
    }

    pub fn current_governor(&self) -> Option<String> {
        self.cpufreq_files("scaling_governor")
            .iter()
            .find_map(|path| std::fs::read_to_string(path).ok())
            .map(|s| s.trim().to_string())
    }

    /// Apply `governor` to every CPU. Returns how many CPUs were updated.
    pub fn set_governor(&self, governor: &str) -> Result<usize> {
        let governor = governor.trim();
        if governor.is_empty() {
            return Err(OptimizerError::InvalidValue("empty governor name".into()));
        }
        let available = self.available_governors();
        if !available.is_empty() && !available.iter().any(|g| g == governor) {
            return Err(OptimizerError::InvalidValue(format!(
                "unknown governor '{governor}', available: {}",
                available.join(", ")
            )));
        }

        let targets = self.cpufreq_files("scaling_governor");
        if targets.is_empty() {
            return Err(OptimizerError::Unsupported(
                "no cpufreq scaling_governor entries found".into(),
            ));
        }

        let mut updated = 0;
        for path in &targets {
            let cpu = path
                .parent()
                .and_then(Path::parent)
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match std::fs::write(path, governor) {
                Ok(()) => {
                    updated += 1;
                    self.reporter.info(
                        SYSTEM_TUNING,
                        &format!("CPU governor set to {governor} for {cpu}"),
                    );
                }
                Err(e) => {
                    self.reporter.error(
                        SYSTEM_TUNING,
                        &format!("Failed to set governor for {cpu}: {e}"),
                    );
                }
            }
        }

        if updated < targets.len() {
            return Err(OptimizerError::PartialFailure {
                action: "set CPU governor".into(),
                failed: targets.len() - updated,
                total: targets.len(),
            });
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::null_reporter;
    use crate::reporter::testing::RecordingReporter;
    use std::fs;

    fn fake_sysfs(cpus: &[(&str, &str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (cpu, current, available) in cpus {
            let freq = dir.path().join(cpu).join("cpufreq");
            fs::create_dir_all(&freq).unwrap();
            fs::write(freq.join("scaling_governor"), format!("{current}\n")).unwrap();
            fs::write(
                freq.join("scaling_available_governors"),
                format!("{available}\n"),
            )
            .unwrap();
        }
        // noise that must not be mistaken for a CPU
        fs::create_dir_all(dir.path().join("cpufreq")).unwrap();
        fs::create_dir_all(dir.path().join("cpuidle")).unwrap();
        dir
    }

    #[test]
    fn test_available_and_current() {
        let dir = fake_sysfs(&[
            ("cpu0", "powersave", "performance powersave"),
            ("cpu1", "powersave", "performance powersave schedutil"),
        ]);
        let tuner = CpuTuner::new(dir.path(), null_reporter());
        assert_eq!(
            tuner.available_governors(),
            vec!["performance", "powersave", "schedutil"]
        );
        assert_eq!(tuner.current_governor().as_deref(), Some("powersave"));
    }

    #[test]
    fn test_set_governor_writes_every_cpu() {
        let dir = fake_sysfs(&[
            ("cpu0", "powersave", "performance powersave"),
            ("cpu10", "powersave", "performance powersave"),
            ("cpu2", "powersave", "performance powersave"),
        ]);
        let rec = RecordingReporter::shared();
        let tuner = CpuTuner::new(dir.path(), rec.clone());
        assert_eq!(tuner.set_governor("performance").unwrap(), 3);
        for cpu in ["cpu0", "cpu2", "cpu10"] {
            let value =
                fs::read_to_string(dir.path().join(cpu).join("cpufreq/scaling_governor"))
                    .unwrap();
            assert_eq!(value.trim(), "performance");
        }
        assert_eq!(rec.records()[0].2, "CPU governor set to performance for cpu0");
        assert_eq!(rec.records()[2].2, "CPU governor set to performance for cpu10");
    }

    #[test]
    fn test_rejects_unknown_governor() {
        let dir = fake_sysfs(&[("cpu0", "powersave", "performance powersave")]);
        let tuner = CpuTuner::new(dir.path(), null_reporter());
        assert!(matches!(
            tuner.set_governor("turbo"),
            Err(OptimizerError::InvalidValue(_))
        ));
        assert!(matches!(
            tuner.set_governor("  "),
            Err(OptimizerError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_no_cpufreq_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let tuner = CpuTuner::new(dir.path(), null_reporter());
        assert!(tuner.available_governors().is_empty());
        assert_eq!(tuner.current_governor(), None);
        assert!(matches!(
            tuner.set_governor("performance"),
            Err(OptimizerError::Unsupported(_))
        ));
    }
}
