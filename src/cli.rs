use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sysopt",
    about = "Inspect system metrics, tune the kernel and find large files",
    version
)]
pub struct Cli {
    /// Log informational output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the largest files under a directory
    Scan {
        /// Root directory (defaults to the home directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// How many files to keep
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Find files by name, extension and size
    Search {
        /// Root directory (defaults to the home directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Case-insensitive substring of the file name
        #[arg(long, default_value = "")]
        name: String,

        /// Case-insensitive file name suffix, e.g. ".log"
        #[arg(long, default_value = "")]
        ext: String,

        /// Minimum file size (e.g. "100MB", "1GB")
        #[arg(long, default_value = "0")]
        min_size: String,
    },

    /// Delete files (requires --confirm to actually delete)
    Delete {
        /// Files to remove
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Actually delete files. Without this flag, only lists them.
        #[arg(long)]
        confirm: bool,
    },

    /// Show current metrics, alerts and recommendations
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Processes to list
        #[arg(long, default_value = "10")]
        processes: usize,
    },

    /// Apply a tuning action
    Tune {
        #[command(subcommand)]
        action: TuneCommand,
    },

    /// Write a JSON performance report
    Report,

    /// Inspect or change scheduled maintenance
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
}

#[derive(Subcommand)]
pub enum TuneCommand {
    /// Show or set the CPU frequency governor
    Governor {
        /// Governor to apply; omit to list the current and available ones
        name: Option<String>,
    },

    /// Show or set vm.swappiness
    Swappiness {
        /// New value (0-200); omit to show the current one
        value: Option<u32>,
    },

    /// Drop the page cache, dentries and inodes
    DropCaches,

    /// Remove the contents of the temp directories
    CleanTemp {
        /// Actually delete. Without this flag, behaves like a scan.
        #[arg(long)]
        confirm: bool,
    },

    /// Clean the package manager cache
    PackageCache,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Print the saved schedule
    Show,

    /// Update the saved schedule
    Set {
        #[arg(long)]
        auto_cleanup: Option<bool>,

        #[arg(long)]
        dark_mode: Option<bool>,

        /// Minutes between tune-ups (0 disables, max 1440)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Execute the scheduled tasks once
    Run,
}
