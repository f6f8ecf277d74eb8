use crate::slice::SliceRecord;
use crate::volume::{IDENTITY_AFFINE, Volume};

use ndarray::{Array3, s};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeBuildError {
    #[error("series contains no slices")]
    EmptySeries,

    #[error("slice dimensions {found:?} do not match first slice {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

pub struct VolumeBuilder;

impl VolumeBuilder {
    /// Stack one series' slices into a volume.
    ///
    /// Slices are sorted ascending by instance index before stacking.
    /// Slices without an index sort before all indexed ones, and ties
    /// keep the aggregator's discovery order (the sort is stable), so a
    /// fixed slice set always yields the same depth ordering.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty slice list or when any plane's
    /// (rows, cols) differs from the first plane's; the whole series
    /// fails, no partial volume is produced.
    pub fn build(
        subject_id: &str,
        series_id: &str,
        mut slices: Vec<SliceRecord>,
    ) -> Result<Volume, VolumeBuildError> {
        if slices.is_empty() {
            return Err(VolumeBuildError::EmptySeries);
        }

        slices.sort_by_key(|slice| slice.instance_index.unwrap_or(i32::MIN));

        let expected = (slices[0].rows(), slices[0].cols());
        for slice in &slices {
            let found = (slice.rows(), slice.cols());
            if found != expected {
                return Err(VolumeBuildError::ShapeMismatch { expected, found });
            }
        }

        let (rows, cols) = expected;
        let depth = slices.len();
        let mut data = Array3::<u16>::zeros((rows, cols, depth));
        for (i, slice) in slices.iter().enumerate() {
            data.slice_mut(s![.., .., i]).assign(&slice.pixels);
        }

        debug!(
            subject = subject_id,
            series = series_id,
            rows,
            cols,
            depth,
            "stacked volume"
        );

        Ok(Volume {
            subject_id: subject_id.to_string(),
            series_id: series_id.to_string(),
            data,
            affine: IDENTITY_AFFINE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::path::PathBuf;

    fn slice(instance_index: Option<i32>, rows: usize, cols: usize, fill: u16) -> SliceRecord {
        SliceRecord {
            source_path: PathBuf::from(format!("slice_{fill}.dcm")),
            subject_id: "P1".into(),
            series_id: "5001".into(),
            instance_index,
            pixels: Array2::from_elem((rows, cols), fill),
        }
    }

    #[test]
    fn stacks_slices_in_instance_order() {
        let volume = VolumeBuilder::build(
            "P1",
            "5001",
            vec![
                slice(Some(3), 2, 2, 30),
                slice(Some(1), 2, 2, 10),
                slice(Some(2), 2, 2, 20),
            ],
        )
        .unwrap();

        assert_eq!(volume.dim(), (2, 2, 3));
        assert_eq!(volume.data[[0, 0, 0]], 10);
        assert_eq!(volume.data[[0, 0, 1]], 20);
        assert_eq!(volume.data[[0, 0, 2]], 30);
        assert_eq!(volume.affine, IDENTITY_AFFINE);
    }

    #[test]
    fn ordering_is_deterministic_under_input_permutation() {
        let permutations: [[i32; 3]; 3] = [[1, 2, 3], [3, 1, 2], [2, 3, 1]];
        for indices in permutations {
            let slices = indices
                .iter()
                .map(|&i| slice(Some(i), 2, 2, i as u16 * 10))
                .collect();
            let volume = VolumeBuilder::build("P1", "5001", slices).unwrap();
            assert_eq!(volume.data[[0, 0, 0]], 10);
            assert_eq!(volume.data[[0, 0, 1]], 20);
            assert_eq!(volume.data[[0, 0, 2]], 30);
        }
    }

    #[test]
    fn missing_index_sorts_first() {
        let volume = VolumeBuilder::build(
            "P1",
            "5001",
            vec![
                slice(Some(2), 2, 2, 20),
                slice(None, 2, 2, 5),
                slice(Some(1), 2, 2, 10),
            ],
        )
        .unwrap();

        assert_eq!(volume.data[[0, 0, 0]], 5);
        assert_eq!(volume.data[[0, 0, 1]], 10);
        assert_eq!(volume.data[[0, 0, 2]], 20);
    }

    #[test]
    fn tied_indices_keep_discovery_order() {
        let volume = VolumeBuilder::build(
            "P1",
            "5001",
            vec![slice(None, 2, 2, 7), slice(None, 2, 2, 8), slice(None, 2, 2, 9)],
        )
        .unwrap();

        assert_eq!(volume.data[[0, 0, 0]], 7);
        assert_eq!(volume.data[[0, 0, 1]], 8);
        assert_eq!(volume.data[[0, 0, 2]], 9);
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let err = VolumeBuilder::build(
            "P1",
            "5001",
            vec![slice(Some(1), 2, 2, 1), slice(Some(2), 3, 2, 2)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            VolumeBuildError::ShapeMismatch {
                expected: (2, 2),
                found: (3, 2),
            }
        ));
    }

    #[test]
    fn rejects_empty_series() {
        let err = VolumeBuilder::build("P1", "5001", Vec::new()).unwrap_err();
        assert!(matches!(err, VolumeBuildError::EmptySeries));
    }
}
