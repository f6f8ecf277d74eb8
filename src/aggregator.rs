use crate::slice::SliceRecord;
use crate::slice_classifier::SliceClassifier;

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// subject id -> series id -> slices in discovery order.
///
/// The map order makes a run process subjects and series
/// deterministically; the order of slices inside a bucket is only used
/// as the stable tie-break when the builder sorts by instance index.
pub type SeriesBuckets = BTreeMap<String, BTreeMap<String, Vec<SliceRecord>>>;

/// Result of one scan pass over an input tree.
pub struct ScanOutcome {
    pub buckets: SeriesBuckets,
    /// Files that did not classify as imaging slices.
    pub rejected: Vec<PathBuf>,
}

impl ScanOutcome {
    pub fn slice_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|series| series.values())
            .map(Vec::len)
            .sum()
    }
}

pub struct SeriesAggregator;

impl SeriesAggregator {
    /// Walk `root` recursively and bucket every classifiable slice by
    /// (subject, series).
    ///
    /// Classification is a pure read and runs in parallel; the merge
    /// into buckets is a single-threaded fold over the results in path
    /// order, so discovery order inside a bucket is reproducible across
    /// runs. A file that fails classification is recorded and skipped,
    /// never aborting the scan.
    pub fn scan(root: &Path) -> ScanOutcome {
        let candidates = Self::collect_files(root);
        info!(root = %root.display(), files = candidates.len(), "scanning input tree");

        let classified: Vec<(PathBuf, Option<SliceRecord>)> = candidates
            .into_par_iter()
            .map(|path| {
                let record = SliceClassifier::classify(&path);
                (path, record)
            })
            .collect();

        let mut buckets = SeriesBuckets::new();
        let mut rejected = Vec::new();
        for (path, record) in classified {
            match record {
                Some(record) => {
                    debug!(
                        path = %path.display(),
                        subject = %record.subject_id,
                        series = %record.series_id,
                        "classified slice"
                    );
                    buckets
                        .entry(record.subject_id.clone())
                        .or_default()
                        .entry(record.series_id.clone())
                        .or_default()
                        .push(record);
                }
                None => rejected.push(path),
            }
        }

        let outcome = ScanOutcome { buckets, rejected };
        info!(
            subjects = outcome.buckets.len(),
            slices = outcome.slice_count(),
            rejected = outcome.rejected.len(),
            "scan complete"
        );
        outcome
    }

    fn collect_files(root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }
}
