use std::path::Path;

use crate::error::{OptimizerError, Result};
use crate::files::PathWalker;

/// Apparent size of every regular file below `path`.
pub fn dir_size(path: &Path) -> u64 {
    PathWalker::new(path)
        .walk()
        .filter_map(|file| std::fs::symlink_metadata(file).ok())
        .map(|meta| meta.len())
        .sum()
}

/// Get size of a file or directory. Symlinks count as their own size.
pub fn entry_size(path: &Path) -> u64 {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_dir() => dir_size(path),
        Ok(meta) => meta.len(),
        Err(_) => 0,
    }
}

/// Remove a file, symlink or directory tree. Returns bytes freed on success.
pub fn safe_remove(path: &Path) -> std::io::Result<u64> {
    let size = entry_size(path);
    if path.symlink_metadata()?.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(size)
}

/// Parse human-readable size string ("100MB", "1.5gb", "512") into bytes.
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();
    let upper = s.to_ascii_uppercase();
    let (num_str, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = upper.strip_suffix("KB") {
        (n, 1_024)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (upper.as_str(), 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| OptimizerError::InvalidValue(format!("invalid size: '{s}'")))?;

    if !num.is_finite() || num < 0.0 {
        return Err(OptimizerError::InvalidValue(format!(
            "size cannot be negative: '{s}'"
        )));
    }

    Ok((num * multiplier as f64) as u64)
}

const SIZE_UNITS: [(u64, &str); 3] = [(1 << 30, "GB"), (1 << 20, "MB"), (1 << 10, "KB")];

/// Render a byte count with two decimals in the largest fitting unit.
pub fn format_size(bytes: u64) -> String {
    SIZE_UNITS
        .iter()
        .find(|(scale, _)| bytes >= *scale)
        .map(|(scale, unit)| format!("{:.2} {unit}", bytes as f64 / *scale as f64))
        .unwrap_or_else(|| format!("{bytes} B"))
}

/// Shorten a path for display by replacing `home` with ~.
pub fn display_path(path: &Path, home: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(home) {
        format!("~/{}", relative.display())
    } else {
        path.display().to_string()
    }
}
