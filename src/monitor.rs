use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use procfs::net::TcpState;
use serde::Serialize;
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};

use crate::config::AppConfig;
use crate::history::HistoricalSeries;
use crate::reporter::{Reporter, SharedReporter, CPU};

const HIGH_USAGE_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Serialize)]
pub struct CpuMetrics {
    pub total: f64,
    pub per_core: Vec<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    /// Memory available for new allocations, not just unused pages.
    pub free: u64,
    pub percent: f64,
    pub swap: SwapMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// An open socket from the kernel's TCP/UDP tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// `tcp`, `tcp6`, `udp` or `udp6`.
    pub kind: String,
    pub local: String,
    /// Empty for unconnected sockets.
    pub remote: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkMetrics {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub connections: Vec<ConnectionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disk: BTreeMap<String, DiskMetrics>,
    pub network: NetworkMetrics,
    pub top_processes: Vec<ProcessSnapshot>,
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Collects system metrics and keeps short histories for CPU, memory and
/// network throughput.
pub struct SystemMonitor {
    sys: System,
    thermal_root: PathBuf,
    prev_net: (u64, u64),
    pub cpu_history: HistoricalSeries,
    pub memory_history: HistoricalSeries,
    pub network_history: HistoricalSeries,
    reporter: SharedReporter,
}

impl SystemMonitor {
    pub fn new(config: &AppConfig, reporter: SharedReporter) -> Self {
        let mut sys = System::new();
        // prime the counters so the first reading is a delta
        sys.refresh_cpu_usage();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        Self {
            sys,
            thermal_root: config.thermal_root.clone(),
            prev_net: network_totals(),
            cpu_history: HistoricalSeries::new(config.history_size),
            memory_history: HistoricalSeries::new(config.history_size),
            network_history: HistoricalSeries::new(config.history_size),
            reporter,
        }
    }

    pub fn cpu_metrics(&mut self) -> CpuMetrics {
        self.sys.refresh_cpu_usage();
        let total = self.sys.global_cpu_usage() as f64;
        let per_core = self
            .sys
            .cpus()
            .iter()
            .map(|c| c.cpu_usage() as f64)
            .collect();

        let temperature = read_cpu_temperature(&self.thermal_root);
        if temperature.is_none() {
            self.reporter
                .warn(CPU, "CPU temperature reading not supported on this platform");
        }

        self.cpu_history.push(total);
        self.reporter
            .info(CPU, &format!("Updated CPU usage to {total:.2}%"));
        CpuMetrics {
            total,
            per_core,
            temperature,
        }
    }

    pub fn memory_metrics(&mut self) -> MemoryMetrics {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();

        let metrics = MemoryMetrics {
            total,
            used,
            free: self.sys.available_memory(),
            percent: percent(used, total),
            swap: SwapMetrics {
                total: swap_total,
                used: swap_used,
                free: self.sys.free_swap(),
                percent: percent(swap_used, swap_total),
            },
        };
        self.memory_history.push(metrics.percent);
        metrics
    }

    /// Process CPU usage is measured over the time since the previous
    /// process refresh, so each snapshot refreshes exactly once.
    fn refresh_processes(&mut self) {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
    }

    /// Usage per mount point plus the I/O performed since the last refresh.
    pub fn disk_metrics(&mut self) -> BTreeMap<String, DiskMetrics> {
        self.refresh_processes();
        self.collect_disk_metrics()
    }

    fn collect_disk_metrics(&self) -> BTreeMap<String, DiskMetrics> {
        let (read_bytes, write_bytes) = self
            .sys
            .processes()
            .values()
            .map(|p| p.disk_usage())
            .fold((0u64, 0u64), |(r, w), u| {
                (r.saturating_add(u.read_bytes), w.saturating_add(u.written_bytes))
            });

        let disks = Disks::new_with_refreshed_list();
        let mut metrics = BTreeMap::new();
        for disk in disks.list() {
            let total = disk.total_space();
            if total == 0 {
                continue;
            }
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            metrics.insert(
                disk.mount_point().display().to_string(),
                DiskMetrics {
                    total,
                    used,
                    free,
                    percent: percent(used, total),
                    read_bytes,
                    write_bytes,
                },
            );
        }
        metrics
    }

    /// Bytes moved since the previous call.
    pub fn network_metrics(&mut self) -> NetworkMetrics {
        let (sent_total, recv_total) = network_totals();
        let (prev_sent, prev_recv) = self.prev_net;
        let bytes_sent = sent_total.saturating_sub(prev_sent);
        let bytes_recv = recv_total.saturating_sub(prev_recv);
        self.prev_net = (sent_total, recv_total);

        self.network_history.push(bytes_sent.max(bytes_recv) as f64);
        NetworkMetrics {
            bytes_sent,
            bytes_recv,
            connections: network_connections(&*self.reporter),
        }
    }

    /// Busiest processes by CPU usage.
    pub fn running_processes(&mut self, limit: usize) -> Vec<ProcessSnapshot> {
        self.refresh_processes();
        self.top_processes(limit)
    }

    fn top_processes(&self, limit: usize) -> Vec<ProcessSnapshot> {
        let mut processes: Vec<ProcessSnapshot> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSnapshot {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                cpu_percent: process.cpu_usage() as f64,
            })
            .collect();
        processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        processes.truncate(limit);
        processes
    }

    pub fn snapshot(&mut self, process_limit: usize) -> MetricsSnapshot {
        let cpu = self.cpu_metrics();
        let memory = self.memory_metrics();
        self.refresh_processes();
        MetricsSnapshot {
            cpu,
            memory,
            disk: self.collect_disk_metrics(),
            network: self.network_metrics(),
            top_processes: self.top_processes(process_limit),
        }
    }
}

/// Warnings worth surfacing for a snapshot. CPU takes precedence.
pub fn alerts(snapshot: &MetricsSnapshot) -> Vec<String> {
    if snapshot.cpu.total > HIGH_USAGE_PERCENT {
        vec!["High CPU usage detected!".to_string()]
    } else if snapshot.memory.percent > HIGH_USAGE_PERCENT {
        vec!["High memory usage detected!".to_string()]
    } else {
        vec![]
    }
}

fn network_totals() -> (u64, u64) {
    let networks = Networks::new_with_refreshed_list();
    networks
        .list()
        .values()
        .fold((0u64, 0u64), |(sent, recv), data| {
            (
                sent.saturating_add(data.total_transmitted()),
                recv.saturating_add(data.total_received()),
            )
        })
}

/// Sockets listed in `/proc/net/{tcp,tcp6,udp,udp6}`. A table that cannot
/// be read is skipped with a warning.
pub fn network_connections(reporter: &dyn Reporter) -> Vec<ConnectionInfo> {
    let mut connections = Vec::new();

    for (kind, table) in [("tcp", procfs::net::tcp()), ("tcp6", procfs::net::tcp6())] {
        match table {
            Ok(entries) => connections.extend(entries.iter().map(|entry| ConnectionInfo {
                kind: kind.to_string(),
                local: socket_label(&entry.local_address),
                remote: socket_label(&entry.remote_address),
                status: tcp_status(&entry.state),
            })),
            Err(e) => reporter.warn(CPU, &format!("Cannot read {kind} connections: {e}")),
        }
    }

    for (kind, table) in [("udp", procfs::net::udp()), ("udp6", procfs::net::udp6())] {
        match table {
            Ok(entries) => connections.extend(entries.iter().map(|entry| ConnectionInfo {
                kind: kind.to_string(),
                local: socket_label(&entry.local_address),
                remote: socket_label(&entry.remote_address),
                status: "NONE".to_string(),
            })),
            Err(e) => reporter.warn(CPU, &format!("Cannot read {kind} connections: {e}")),
        }
    }

    connections
}

fn socket_label(addr: &SocketAddr) -> String {
    if addr.ip().is_unspecified() && addr.port() == 0 {
        String::new()
    } else {
        addr.to_string()
    }
}

fn tcp_status(state: &TcpState) -> String {
    match state {
        TcpState::Listen => "LISTEN".to_string(),
        TcpState::Established => "ESTABLISHED".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}

/// First readable `thermal_zone*/temp`, converted from millidegrees Celsius.
fn read_cpu_temperature(thermal_root: &Path) -> Option<f64> {
    let mut zones: Vec<PathBuf> = std::fs::read_dir(thermal_root)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("thermal_zone"))
        .map(|e| e.path().join("temp"))
        .collect();
    zones.sort();

    zones.iter().find_map(|path| {
        let raw = std::fs::read_to_string(path).ok()?;
        let millis: i64 = raw.trim().parse().ok()?;
        Some(millis as f64 / 1000.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::null_reporter;
    use crate::reporter::testing::RecordingReporter;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn snapshot_with(cpu: f64, mem: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu: CpuMetrics {
                total: cpu,
                per_core: vec![cpu],
                temperature: None,
            },
            memory: MemoryMetrics {
                total: 100,
                used: mem as u64,
                free: 100 - mem as u64,
                percent: mem,
                swap: SwapMetrics {
                    total: 0,
                    used: 0,
                    free: 0,
                    percent: 0.0,
                },
            },
            disk: BTreeMap::new(),
            network: NetworkMetrics {
                bytes_sent: 0,
                bytes_recv: 0,
                connections: vec![],
            },
            top_processes: vec![],
        }
    }

    #[test]
    fn test_alerts() {
        assert!(alerts(&snapshot_with(10.0, 10.0)).is_empty());
        assert_eq!(alerts(&snapshot_with(95.0, 95.0)), vec!["High CPU usage detected!"]);
        assert_eq!(
            alerts(&snapshot_with(50.0, 91.0)),
            vec!["High memory usage detected!"]
        );
    }

    #[test]
    fn test_percent_handles_zero_total() {
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(25, 100), 25.0);
    }

    #[test]
    fn test_temperature_from_fake_thermal_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("thermal_zone1")).unwrap();
        fs::create_dir_all(dir.path().join("thermal_zone0")).unwrap();
        fs::create_dir_all(dir.path().join("cooling_device0")).unwrap();
        fs::write(dir.path().join("thermal_zone0/temp"), "not a number\n").unwrap();
        fs::write(dir.path().join("thermal_zone1/temp"), "47500\n").unwrap();
        fs::write(dir.path().join("cooling_device0/temp"), "99000\n").unwrap();

        assert_eq!(read_cpu_temperature(dir.path()), Some(47.5));
    }

    #[test]
    fn test_temperature_missing_root() {
        assert_eq!(
            read_cpu_temperature(Path::new("/nonexistent_sysopt_root_12345")),
            None
        );
    }

    #[test]
    fn test_monitor_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::with_home(dir.path());
        config.history_size = 2;
        config.thermal_root = dir.path().join("thermal");
        let mut monitor = SystemMonitor::new(&config, null_reporter());

        for _ in 0..3 {
            monitor.cpu_metrics();
            monitor.memory_metrics();
            monitor.network_metrics();
        }
        assert_eq!(monitor.cpu_history.len(), 2);
        assert_eq!(monitor.memory_history.len(), 2);
        assert_eq!(monitor.network_history.len(), 2);

        let mem = monitor.memory_metrics();
        assert!(mem.total > 0);
        assert!((0.0..=100.0).contains(&mem.percent));
    }

    #[test]
    fn test_running_processes_sorted_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::with_home(dir.path());
        let mut monitor = SystemMonitor::new(&config, null_reporter());
        let procs = monitor.running_processes(5);
        assert!(procs.len() <= 5);
        assert!(procs
            .windows(2)
            .all(|w| w[0].cpu_percent >= w[1].cpu_percent));
    }

    #[test]
    fn test_snapshot_measures_cpu_since_previous_refresh() {
        let stop = Arc::new(AtomicBool::new(false));
        let spinner = {
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut n = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    n = std::hint::black_box(n.wrapping_add(1));
                }
            })
        };

        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::with_home(dir.path());
        config.thermal_root = dir.path().join("thermal");
        let mut monitor = SystemMonitor::new(&config, null_reporter());
        std::thread::sleep(Duration::from_secs(1));
        let snapshot = monitor.snapshot(usize::MAX);

        stop.store(true, Ordering::Relaxed);
        spinner.join().unwrap();

        let own = snapshot
            .top_processes
            .iter()
            .find(|p| p.pid == std::process::id())
            .map(|p| p.cpu_percent);
        assert!(own.is_some_and(|cpu| cpu > 50.0), "own cpu usage: {own:?}");
    }

    #[test]
    fn test_connections_include_listening_socket() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let rec = RecordingReporter::default();

        let connections = network_connections(&rec);
        let entry = connections
            .iter()
            .find(|c| c.kind == "tcp" && c.local == format!("127.0.0.1:{port}"))
            .expect("listening socket is listed");
        assert_eq!(entry.status, "LISTEN");
        assert_eq!(entry.remote, "");
    }

    #[test]
    fn test_socket_label() {
        assert_eq!(socket_label(&"0.0.0.0:0".parse().unwrap()), "");
        assert_eq!(socket_label(&"10.0.0.2:443".parse().unwrap()), "10.0.0.2:443");
        assert_eq!(tcp_status(&TcpState::Listen), "LISTEN");
        assert_eq!(tcp_status(&TcpState::TimeWait), "TIMEWAIT");
    }
}
