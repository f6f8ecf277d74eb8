use crate::aggregator::{ScanOutcome, SeriesAggregator};
use crate::cleanup::{self, CleanupReport};
use crate::nifti_writer::{NiftiWriter, WriteError};
use crate::slice::SliceRecord;
use crate::volume_builder::{VolumeBuildError, VolumeBuilder};

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Explicit pipeline configuration. There is no process-wide state;
/// every run gets its own roots.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory tree of already-extracted candidate files.
    pub input_root: PathBuf,
    /// Directory receiving one volume file per (subject, series).
    pub output_root: PathBuf,
}

/// Why one (subject, series) failed to produce a volume.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Build(#[from] VolumeBuildError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug)]
pub struct SeriesFailure {
    pub subject_id: String,
    pub series_id: String,
    pub error: SeriesError,
}

/// Per-run accounting handed back to the caller.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub series_total: usize,
    pub series_succeeded: usize,
    pub failures: Vec<SeriesFailure>,
    pub files_rejected: usize,
    pub files_deleted: usize,
    pub deletion_errors: usize,
}

pub struct Pipeline;

impl Pipeline {
    /// Run the full discovery and reconstruction pass: scan the input
    /// tree, then build, serialize and clean up every (subject, series)
    /// found.
    ///
    /// Failures are isolated per series: a failed build or write leaves
    /// that series' source files in place and the run moves on to the
    /// next series.
    pub fn run(config: &PipelineConfig) -> RunSummary {
        let ScanOutcome { buckets, rejected } = SeriesAggregator::scan(&config.input_root);

        let mut summary = RunSummary {
            files_rejected: rejected.len(),
            ..RunSummary::default()
        };

        for (subject_id, series_map) in buckets {
            for (series_id, slices) in series_map {
                summary.series_total += 1;
                match Self::process_series(config, &subject_id, &series_id, slices) {
                    Ok(report) => {
                        summary.series_succeeded += 1;
                        summary.files_deleted += report.deleted;
                        summary.deletion_errors += report.errors.len();
                    }
                    Err(error) => {
                        warn!(subject = %subject_id, series = %series_id, %error, "series failed");
                        summary.failures.push(SeriesFailure {
                            subject_id: subject_id.clone(),
                            series_id,
                            error,
                        });
                    }
                }
            }
        }

        info!(
            series_total = summary.series_total,
            series_succeeded = summary.series_succeeded,
            files_rejected = summary.files_rejected,
            files_deleted = summary.files_deleted,
            "run complete"
        );
        summary
    }

    /// Build, write, then clean up a single series. Strictly in that
    /// order: sources are only removed once the volume file is on disk.
    fn process_series(
        config: &PipelineConfig,
        subject_id: &str,
        series_id: &str,
        slices: Vec<SliceRecord>,
    ) -> Result<CleanupReport, SeriesError> {
        let source_paths: Vec<PathBuf> =
            slices.iter().map(|slice| slice.source_path.clone()).collect();
        info!(
            subject = subject_id,
            series = series_id,
            slices = slices.len(),
            "reconstructing series"
        );

        let volume = VolumeBuilder::build(subject_id, series_id, slices)?;
        let destination = Self::volume_path(config, subject_id, series_id);
        NiftiWriter::write(&volume, &destination)?;

        Ok(cleanup::remove_source_files(&source_paths))
    }

    /// `<output_root>/<subject>/<series>.nii.gz`
    fn volume_path(config: &PipelineConfig, subject_id: &str, series_id: &str) -> PathBuf {
        config
            .output_root
            .join(sanitize_component(subject_id))
            .join(format!("{}.nii.gz", sanitize_component(series_id)))
    }
}

/// Subject and series ids come from folder names and tag values; keep
/// them filesystem-safe when they become path components.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
