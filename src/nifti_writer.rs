use crate::volume::Volume;

use nifti::{NiftiHeader, writer::WriterOptions};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),
}

pub struct NiftiWriter;

impl NiftiWriter {
    /// Serialize `volume` into a self-describing NIfTI-1 file at
    /// `destination`, creating parent directories as needed. A
    /// `.nii.gz` destination is written gzip-compressed, a plain
    /// `.nii` uncompressed.
    ///
    /// # Errors
    ///
    /// Any error means the volume is not on disk; callers must not
    /// delete the series' source files in that case.
    pub fn write(volume: &Volume, destination: &Path) -> Result<(), WriteError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        WriterOptions::new(destination)
            .reference_header(&Self::header_for(volume))
            .write_nifti(&volume.data)?;

        info!(
            subject = %volume.subject_id,
            series = %volume.series_id,
            depth = volume.depth(),
            destination = %destination.display(),
            "volume written"
        );
        Ok(())
    }

    /// Header carrying the volume's affine as the sform; dimensions
    /// and data type are filled in by the writer from the array itself.
    fn header_for(volume: &Volume) -> NiftiHeader {
        let mut header = NiftiHeader::default();
        header.sform_code = 1;
        header.srow_x = volume.affine[0];
        header.srow_y = volume.affine[1];
        header.srow_z = volume.affine[2];
        header
    }
}
