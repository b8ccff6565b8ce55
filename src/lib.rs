//! Linux system optimizer: large-file scanning and search, system metrics,
//! and kernel tuning helpers.

pub mod config;
pub mod disk_info;
pub mod error;
pub mod files;
pub mod history;
pub mod monitor;
pub mod report;
pub mod reporter;
pub mod tuning;
pub mod utils;

pub use error::{OptimizerError, Result};
