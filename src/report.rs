use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::monitor::{MetricsSnapshot, SystemMonitor};
use crate::reporter::{Reporter, REPORTS};
use crate::utils::format_size;

/// Processes listed in a performance report.
pub const REPORT_PROCESS_LIMIT: usize = 50;

#[derive(Serialize)]
struct PerformanceReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    snapshot: &'a MetricsSnapshot,
}

/// Collect a fresh snapshot and write it as a JSON report.
pub fn generate_performance_report(
    monitor: &mut SystemMonitor,
    reports_dir: &Path,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    let snapshot = monitor.snapshot(REPORT_PROCESS_LIMIT);
    write_report(&snapshot, reports_dir, Local::now(), reporter)
}

/// Write `snapshot` under `reports_dir`. If the JSON report cannot be
/// produced, a text file describing the failure is written instead and its
/// path returned.
pub fn write_report(
    snapshot: &MetricsSnapshot,
    reports_dir: &Path,
    now: DateTime<Local>,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let path = reports_dir.join(format!("performance_report_{stamp}.json"));

    let attempt = write_json(snapshot, reports_dir, &path, &now);

    match attempt {
        Ok(()) => {
            reporter.info(
                REPORTS,
                &format!("Generated performance report {}", path.display()),
            );
            Ok(path)
        }
        Err(e) => {
            reporter.error(
                REPORTS,
                &format!("Failed to generate performance report: {e}"),
            );
            let fallback = reports_dir.join(format!("performance_report_error_{stamp}.txt"));
            std::fs::write(&fallback, format!("Failed to generate report: {e}\n"))?;
            Ok(fallback)
        }
    }
}

fn write_json(
    snapshot: &MetricsSnapshot,
    reports_dir: &Path,
    path: &Path,
    now: &DateTime<Local>,
) -> Result<()> {
    std::fs::create_dir_all(reports_dir)?;
    let report = PerformanceReport {
        generated_at: now.to_rfc3339(),
        snapshot,
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

/// Human-readable, multi-line summary of a snapshot.
pub fn format_snapshot(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let cpu = &snapshot.cpu;
    let per_core = cpu
        .per_core
        .iter()
        .map(|c| format!("{c:.1}%"))
        .collect::<Vec<_>>()
        .join(", ");
    let temp = cpu
        .temperature
        .map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| "N/A".to_string());
    let _ = writeln!(
        out,
        "CPU Usage: {:.2}% | Per Core: {per_core} | Temp: {temp}",
        cpu.total
    );

    let mem = &snapshot.memory;
    let _ = writeln!(
        out,
        "Memory: {} used / {} ({:.1}%) | Swap: {} / {}",
        format_size(mem.used),
        format_size(mem.total),
        mem.percent,
        format_size(mem.swap.used),
        format_size(mem.swap.total),
    );

    for (mount, disk) in &snapshot.disk {
        let _ = writeln!(
            out,
            "Disk {mount}: {} used / {} ({:.1}%) | read {} | written {}",
            format_size(disk.used),
            format_size(disk.total),
            disk.percent,
            format_size(disk.read_bytes),
            format_size(disk.write_bytes),
        );
    }

    let network = &snapshot.network;
    let _ = writeln!(
        out,
        "Network: sent {} | received {} | {} connections",
        format_size(network.bytes_sent),
        format_size(network.bytes_recv),
        network.connections.len(),
    );
    for conn in network.connections.iter().filter(|c| c.status == "ESTABLISHED") {
        let _ = writeln!(out, "  {:<5} {:<24} -> {}", conn.kind, conn.local, conn.remote);
    }

    if !snapshot.top_processes.is_empty() {
        let _ = writeln!(out, "Top processes:");
        for p in &snapshot.top_processes {
            let _ = writeln!(out, "  {:>7}  {:<24} {:>6.1}%", p.pid, p.name, p.cpu_percent);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        ConnectionInfo, CpuMetrics, DiskMetrics, MemoryMetrics, NetworkMetrics, ProcessSnapshot,
        SwapMetrics,
    };
    use crate::reporter::testing::RecordingReporter;
    use chrono::TimeZone;
    use log::Level;
    use std::collections::BTreeMap;

    fn sample() -> MetricsSnapshot {
        let mut disk = BTreeMap::new();
        disk.insert(
            "/".to_string(),
            DiskMetrics {
                total: 2_048,
                used: 1_024,
                free: 1_024,
                percent: 50.0,
                read_bytes: 10,
                write_bytes: 20,
            },
        );
        MetricsSnapshot {
            cpu: CpuMetrics {
                total: 12.5,
                per_core: vec![10.0, 15.0],
                temperature: Some(41.0),
            },
            memory: MemoryMetrics {
                total: 4_096,
                used: 1_024,
                free: 3_072,
                percent: 25.0,
                swap: SwapMetrics {
                    total: 0,
                    used: 0,
                    free: 0,
                    percent: 0.0,
                },
            },
            disk,
            network: NetworkMetrics {
                bytes_sent: 1,
                bytes_recv: 2,
                connections: vec![
                    ConnectionInfo {
                        kind: "tcp".into(),
                        local: "0.0.0.0:22".into(),
                        remote: String::new(),
                        status: "LISTEN".into(),
                    },
                    ConnectionInfo {
                        kind: "tcp".into(),
                        local: "10.0.0.5:51000".into(),
                        remote: "10.0.0.9:443".into(),
                        status: "ESTABLISHED".into(),
                    },
                ],
            },
            top_processes: vec![ProcessSnapshot {
                pid: 42,
                name: "init".into(),
                cpu_percent: 3.0,
            }],
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap()
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let rec = RecordingReporter::default();

        let path = write_report(&sample(), &reports, fixed_time(), &rec).unwrap();
        assert_eq!(path, reports.join("performance_report_20240309_140506.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["generated_at"].as_str().unwrap().starts_with("2024-03-09T14:05:06"));
        assert_eq!(json["cpu"]["total"], 12.5);
        assert_eq!(json["memory"]["swap"]["total"], 0);
        assert_eq!(json["disk"]["/"]["read_bytes"], 10);
        assert_eq!(json["network"]["bytes_recv"], 2);
        assert_eq!(json["network"]["connections"][0]["status"], "LISTEN");
        assert_eq!(json["top_processes"][0]["pid"], 42);
        assert_eq!(rec.count(Level::Info), 1);
    }

    #[test]
    fn test_write_report_falls_back_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().to_path_buf();
        // a directory squatting on the report path makes the JSON write fail
        std::fs::create_dir(reports.join("performance_report_20240309_140506.json")).unwrap();
        let rec = RecordingReporter::default();

        let path = write_report(&sample(), &reports, fixed_time(), &rec).unwrap();
        assert_eq!(path, reports.join("performance_report_error_20240309_140506.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Failed to generate report:"));
        assert_eq!(rec.count(Level::Error), 1);
    }

    #[test]
    fn test_format_snapshot() {
        let text = format_snapshot(&sample());
        assert!(text.contains("CPU Usage: 12.50% | Per Core: 10.0%, 15.0% | Temp: 41.0°C"));
        assert!(text.contains("Memory: 1.00 KB used / 4.00 KB (25.0%)"));
        assert!(text.contains("Disk /: 1.00 KB used / 2.00 KB (50.0%)"));
        assert!(text.contains("init"));
        assert!(text.contains("| 2 connections"));
        assert!(text.contains("10.0.0.5:51000"));
        assert!(!text.contains("0.0.0.0:22"));
    }
}
