//! # DICOM-NIfTI reconstruction library
//!
//! This crate turns an unstructured tree of extracted archive files into
//! one NIfTI-1 volume per imaging series.
//!
//! It is built on the dicom-rs ecosystem. Every file in the input tree is
//! classified: readable single-frame DICOM images become slices, anything
//! else is skipped. Slices are grouped by subject (the name of their
//! containing folder) and by their Series Number tag, sorted by Instance
//! Number and stacked along a new depth axis into a (rows, cols, depth)
//! array, which is written as `<output>/<subject>/<series>.nii.gz`. Once a
//! volume is safely on disk the source slice files of that series are
//! deleted; a series that fails to build or write keeps its sources.
//!
//! Limitations, by design:
//!  - Only single-frame slice files mapping one-to-one to volume planes
//!  - No 4D/time-series reconstruction
//!  - Volumes carry an identity affine; spatial geometry is not
//!    reconstructed from per-slice position metadata, so consumers must
//!    not assume physically accurate spacing or orientation
//!
//! # Examples
//!
//! ## Reconstructing every series under an upload directory
//!
//! ```no_run
//! use dicom_nifti::{Pipeline, PipelineConfig};
//! use std::path::PathBuf;
//!
//! let summary = Pipeline::run(&PipelineConfig {
//!     input_root: PathBuf::from("uploads"),
//!     output_root: PathBuf::from("processed"),
//! });
//! println!(
//!     "{} of {} series reconstructed",
//!     summary.series_succeeded, summary.series_total
//! );
//! ```

pub mod aggregator;
pub mod cleanup;
pub mod nifti_writer;
pub mod pipeline;
pub mod slice;
pub mod slice_classifier;
pub mod volume;
pub mod volume_builder;

pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
