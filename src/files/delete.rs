use std::path::{Path, PathBuf};

use crate::reporter::{Reporter, FILE_MANAGEMENT};

/// Remove each path independently and return the ones that were removed,
/// in input order. Failures are logged and skipped.
pub fn delete_files<I, P>(paths: I, reporter: &dyn Reporter) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut removed = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => {
                reporter.info(FILE_MANAGEMENT, &format!("Deleted file {}", path.display()));
                removed.push(path.to_path_buf());
            }
            Err(e) => {
                reporter.error(
                    FILE_MANAGEMENT,
                    &format!("Failed to delete {}: {e}", path.display()),
                );
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::fixtures::write_sized;
    use crate::reporter::testing::RecordingReporter;
    use log::Level;

    #[test]
    fn test_partial_failure_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        write_sized(dir.path(), "p1", 1);
        write_sized(dir.path(), "p3", 1);
        let p1 = dir.path().join("p1");
        let p2 = dir.path().join("p2");
        let p3 = dir.path().join("p3");

        let rec = RecordingReporter::default();
        let removed = delete_files([&p1, &p2, &p3], &rec);

        assert_eq!(removed, vec![p1.clone(), p3.clone()]);
        assert!(!p1.exists());
        assert!(!p3.exists());
        assert_eq!(rec.count(Level::Info), 2);
        assert_eq!(rec.count(Level::Error), 1);
    }

    #[test]
    fn test_directory_is_not_removed() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let rec = RecordingReporter::default();
        assert!(delete_files([&sub], &rec).is_empty());
        assert!(sub.exists());
    }

    #[test]
    fn test_empty_input() {
        let rec = RecordingReporter::default();
        let removed = delete_files(Vec::<PathBuf>::new(), &rec);
        assert!(removed.is_empty());
        assert!(rec.records().is_empty());
    }
}
