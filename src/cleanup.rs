use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of deleting one series' source files.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: usize,
    pub skipped: usize,
    pub errors: Vec<(PathBuf, io::Error)>,
}

/// Delete the source slice files of a successfully serialized series.
///
/// Paths that already look like volume artifacts (`.nii` / `.nii.gz`)
/// are skipped so a freshly written output sharing the directory is
/// never removed. Per-file failures are collected and reported;
/// remaining paths are still attempted.
pub fn remove_source_files(paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for path in paths {
        if is_volume_artifact(path) {
            debug!(path = %path.display(), "skipping volume artifact");
            report.skipped += 1;
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted source slice");
                report.deleted += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to delete source slice");
                report.errors.push((path.clone(), err));
            }
        }
    }
    report
}

fn is_volume_artifact(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase());
    matches!(name, Some(name) if name.ends_with(".nii") || name.ends_with(".nii.gz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_sources_but_keeps_volume_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let slice_a = dir.path().join("a.dcm");
        let slice_b = dir.path().join("b.dcm");
        let output = dir.path().join("5001.nii.gz");
        fs::write(&slice_a, b"x").unwrap();
        fs::write(&slice_b, b"x").unwrap();
        fs::write(&output, b"x").unwrap();

        let report = remove_source_files(&[slice_a.clone(), slice_b.clone(), output.clone()]);

        assert_eq!(report.deleted, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.errors.is_empty());
        assert!(!slice_a.exists());
        assert!(!slice_b.exists());
        assert!(output.exists());
    }

    #[test]
    fn collects_per_file_errors_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("already-gone.dcm");
        let present = dir.path().join("present.dcm");
        fs::write(&present, b"x").unwrap();

        let report = remove_source_files(&[missing.clone(), present.clone()]);

        assert_eq!(report.deleted, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, missing);
        assert!(!present.exists());
    }

    #[test]
    fn uncompressed_volume_artifacts_are_skipped_too() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("5001.nii");
        fs::write(&output, b"x").unwrap();

        let report = remove_source_files(&[output.clone()]);

        assert_eq!(report.deleted, 0);
        assert_eq!(report.skipped, 1);
        assert!(output.exists());
    }
}
