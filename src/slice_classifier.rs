use crate::slice::SliceRecord;

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};
use std::path::Path;
use tracing::debug;

/// Fallback identity for slices without a series number and for files
/// sitting in a parentless location.
pub const UNKNOWN_ID: &str = "Unknown";

pub struct SliceClassifier;

impl SliceClassifier {
    /// Classify a file as an imaging slice.
    ///
    /// Returns `None` for anything that is not a readable single-frame
    /// DICOM image: wrong magic, truncated header, undecodable pixel
    /// data. That outcome is expected for arbitrary archive content and
    /// is not an error.
    ///
    /// Only reads the file; never writes or deletes.
    pub fn classify(path: &Path) -> Option<SliceRecord> {
        let object = match open_file(path) {
            Ok(object) => object,
            Err(err) => {
                debug!(path = %path.display(), %err, "not a DICOM file");
                return None;
            }
        };

        let Some(pixels) = Self::decode_pixels(&object) else {
            debug!(path = %path.display(), "no decodable pixel data");
            return None;
        };

        Some(SliceRecord {
            source_path: path.to_path_buf(),
            subject_id: Self::subject_id(path),
            series_id: Self::series_id(&object),
            instance_index: Self::instance_index(&object),
            pixels,
        })
    }

    /// The containing folder is the authoritative subject key; file
    /// content is not consulted. A study may hold several subjects'
    /// data under one root.
    fn subject_id(path: &Path) -> String {
        path.parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_ID.to_string())
    }

    fn series_id(object: &FileDicomObject<InMemDicomObject>) -> String {
        object
            .element(tags::SERIES_NUMBER)
            .ok()
            .and_then(|element| element.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_ID.to_string())
    }

    fn instance_index(object: &FileDicomObject<InMemDicomObject>) -> Option<i32> {
        object.element(tags::INSTANCE_NUMBER).ok()?.to_int::<i32>().ok()
    }

    fn decode_pixels(object: &FileDicomObject<InMemDicomObject>) -> Option<Array2<u16>> {
        let pixel_data = object.decode_pixel_data().ok()?;
        let options = ConvertOptions::new().with_voi_lut(VoiLutOption::First);
        pixel_data
            .to_ndarray_with_options::<u16>(&options)
            .ok()
            .map(|array| array.slice_move(s![0, .., .., 0]))
    }
}
