mod cli;
mod output;

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Command, ScheduleCommand, TuneCommand};
use sysopt::config::{AppConfig, ScheduleConfig};
use sysopt::files::{delete_files, DiskScanner, FileInfo, FileSearch, SearchQuery};
use sysopt::monitor::{self, SystemMonitor};
use sysopt::reporter::{self, SharedReporter};
use sysopt::tuning::{self, Advisor, CpuTuner, MemoryTuner, TuneAction, TuneOutcome};
use sysopt::{report, utils};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = AppConfig::discover()?;
    let reporter = reporter::log_reporter();

    match cli.command {
        Command::Scan { path, limit } => {
            let root = path.unwrap_or_else(|| config.home.clone());
            let limit = limit.unwrap_or(config.scan_limit);
            let results = DiskScanner::new(&root, limit, reporter).scan();
            output::print_banner();
            output::print_header(&format!("Largest files under {}", root.display()));
            print_files(&results, &config.home);
        }
        Command::Search {
            path,
            name,
            ext,
            min_size,
        } => {
            let root = path.unwrap_or_else(|| config.home.clone());
            let query = SearchQuery::new()
                .name(&name)
                .extension(&ext)
                .min_size(utils::parse_size(&min_size)?);
            let results = FileSearch::new(&root, reporter).search(&query);
            output::print_banner();
            output::print_header(&format!("Matches under {}", root.display()));
            print_files(&results, &config.home);
        }
        Command::Delete { paths, confirm } => {
            output::print_banner();
            if !confirm {
                output::print_header("Would delete");
                for path in &paths {
                    output::print_line(&path.display().to_string());
                }
                println!();
                output::print_dry_run_footer("sysopt delete <PATHS>...");
                return Ok(());
            }
            let removed = delete_files(&paths, &*reporter);
            for path in &removed {
                output::print_deleted(&utils::display_path(path, &config.home));
            }
            output::print_removed_summary(removed.len(), paths.len());
        }
        Command::Status { json, processes } => {
            let mut monitor = warmed_up_monitor(&config, reporter.clone());
            let snapshot = monitor.snapshot(processes);
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }
            output::print_banner();
            output::print_header("System Status");
            for line in report::format_snapshot(&snapshot).lines() {
                output::print_line(line);
            }
            println!();
            for alert in monitor::alerts(&snapshot) {
                output::print_warning(&alert);
            }
            output::print_header("Recommendations");
            for rec in Advisor::new(&config, reporter).recommendations() {
                output::print_recommendation(&rec);
            }
        }
        Command::Tune { action } => run_tune(action, &config, &reporter)?,
        Command::Report => {
            config.ensure_dirs()?;
            let mut monitor = warmed_up_monitor(&config, reporter.clone());
            let path =
                report::generate_performance_report(&mut monitor, &config.reports_dir, &*reporter)?;
            output::print_success(&format!("Report generated: {}", path.display()));
        }
        Command::Schedule { action } => run_schedule(action, &config, &reporter)?,
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if verbose || log_file.is_some() {
        "info"
    } else {
        "warn"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {} - {}",
            buf.timestamp(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// CPU usage is a delta, so the first reading needs a short wait.
fn warmed_up_monitor(config: &AppConfig, reporter: SharedReporter) -> SystemMonitor {
    let monitor = SystemMonitor::new(config, reporter);
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    monitor
}

fn print_files(files: &[FileInfo], home: &Path) {
    if files.is_empty() {
        output::print_info("No files found.");
        return;
    }
    for file in files {
        output::print_file_entry(
            &utils::display_path(&file.path, home),
            &utils::format_size(file.size),
        );
    }
    let total: u64 = files.iter().map(|f| f.size).sum();
    println!();
    output::print_total(
        &format!("{} file(s), total", files.len()),
        &utils::format_size(total),
    );
}

fn run_tune(
    action: TuneCommand,
    config: &AppConfig,
    reporter: &SharedReporter,
) -> anyhow::Result<()> {
    let action = match action {
        TuneCommand::Governor { name: None } => {
            let cpu = CpuTuner::new(&config.cpu_sysfs_root, reporter.clone());
            let current = cpu.current_governor().unwrap_or_else(|| "Unknown".into());
            output::print_info(&format!("Current: {current}"));
            output::print_info(&format!(
                "Available: {}",
                cpu.available_governors().join(", ")
            ));
            return Ok(());
        }
        TuneCommand::Swappiness { value: None } => {
            let memory = MemoryTuner::new(
                &config.swappiness_path,
                &config.drop_caches_path,
                reporter.clone(),
            );
            match memory.swappiness() {
                Some(value) => output::print_info(&format!("Swappiness: {value}")),
                None => output::print_warning("Unable to read swappiness value"),
            }
            return Ok(());
        }
        TuneCommand::Governor { name: Some(name) } => TuneAction::SetGovernor(name),
        TuneCommand::Swappiness { value: Some(value) } => TuneAction::SetSwappiness(value),
        TuneCommand::DropCaches => TuneAction::DropCaches,
        TuneCommand::CleanTemp { confirm } => TuneAction::CleanTemp { dry_run: !confirm },
        TuneCommand::PackageCache => TuneAction::CleanPackageCache,
    };

    let outcome = tuning::apply(&action, config, reporter)
        .with_context(|| format!("{action:?} failed"))?;
    print_outcome(&outcome, &config.home);
    Ok(())
}

fn print_outcome(outcome: &TuneOutcome, home: &Path) {
    if let TuneOutcome::TempCleaned { dry_run, result } = outcome {
        for entry in &result.entries {
            output::print_file_entry(
                &utils::display_path(&entry.path, home),
                &utils::format_size(entry.size_bytes),
            );
        }
        for err in &result.errors {
            output::print_warning(err);
        }
        output::print_total("Total", &utils::format_size(result.total_bytes));
        if *dry_run {
            output::print_dry_run_footer("sysopt tune clean-temp");
            return;
        }
    }
    output::print_success(&outcome.to_string());
}

fn run_schedule(
    action: ScheduleCommand,
    config: &AppConfig,
    reporter: &SharedReporter,
) -> anyhow::Result<()> {
    let mut schedule = ScheduleConfig::load(&config.schedule_path, &**reporter);
    match action {
        ScheduleCommand::Show => {
            output::print_header(&format!("Schedule ({})", config.schedule_path.display()));
            output::print_line(&format!("auto_cleanup     {}", schedule.auto_cleanup()));
            output::print_line(&format!("dark_mode        {}", schedule.dark_mode()));
            output::print_line(&format!(
                "tuneup_interval  {} min",
                schedule.tuneup_interval()
            ));
            for (key, value) in schedule.iter() {
                if !matches!(key.as_str(), "auto_cleanup" | "dark_mode" | "tuneup_interval") {
                    output::print_line(&format!("{key:<16} {value}"));
                }
            }
        }
        ScheduleCommand::Set {
            auto_cleanup,
            dark_mode,
            interval,
        } => {
            if let Some(value) = auto_cleanup {
                schedule.set("auto_cleanup", value);
            }
            if let Some(value) = dark_mode {
                schedule.set("dark_mode", value);
            }
            if let Some(minutes) = interval {
                schedule.set_tuneup_interval(minutes)?;
            }
            schedule.save(&config.schedule_path, &**reporter)?;
            output::print_success("Schedule saved");
        }
        ScheduleCommand::Run => {
            let outcomes = tuning::run_scheduled(&schedule, config, reporter);
            if outcomes.is_empty() {
                output::print_info("No scheduled tasks enabled.");
            }
            for outcome in &outcomes {
                output::print_success(&outcome.to_string());
            }
        }
    }
    Ok(())
}
