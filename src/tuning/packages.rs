use std::process::Command;

use crate::error::{OptimizerError, Result};
use crate::reporter::{SharedReporter, SYSTEM_TUNING};

const PACKAGE_CACHE_COMMANDS: &[&[&str]] = &[&["apt", "clean"], &["apt", "autoremove", "-y"]];

/// Clears the system package manager cache.
pub struct PackageCache {
    commands: Vec<Vec<String>>,
    reporter: SharedReporter,
}

impl PackageCache {
    pub fn new(reporter: SharedReporter) -> Self {
        let commands = PACKAGE_CACHE_COMMANDS
            .iter()
            .map(|cmd| cmd.iter().map(|s| s.to_string()).collect())
            .collect();
        Self::with_commands(commands, reporter)
    }

    pub fn with_commands(commands: Vec<Vec<String>>, reporter: SharedReporter) -> Self {
        Self { commands, reporter }
    }

    /// Run every command; a failure is logged and the rest still run.
    pub fn clean(&self) -> Result<()> {
        let mut failed = 0;
        for command in &self.commands {
            match run(command) {
                Ok(()) => {
                    self.reporter
                        .info(SYSTEM_TUNING, &format!("Executed {}", command.join(" ")));
                }
                Err(e) => {
                    failed += 1;
                    self.reporter.error(SYSTEM_TUNING, &e.to_string());
                }
            }
        }

        if failed > 0 {
            return Err(OptimizerError::PartialFailure {
                action: "clean package cache".into(),
                failed,
                total: self.commands.len(),
            });
        }
        Ok(())
    }
}

fn run(command: &[String]) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| OptimizerError::InvalidValue("empty command".into()))?;
    let failed = |reason: String| OptimizerError::CommandFailed {
        command: command.join(" "),
        reason,
    };

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| failed(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(failed(format!("{}: {stderr}", output.status)));
    }
    Ok(())
}
