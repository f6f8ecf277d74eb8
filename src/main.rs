use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use dicom_nifti::{Pipeline, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dicom-nifti")]
#[command(about = "Reconstruct NIfTI volumes from unsorted DICOM slice archives")]
#[command(version)]
struct Args {
    /// Directory tree containing extracted slice files
    input: PathBuf,

    /// Directory receiving one volume file per (subject, series)
    #[arg(short, long, default_value = "processed")]
    output: PathBuf,

    /// Log per-file classification outcomes
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if !args.input.is_dir() {
        bail!("input directory does not exist: {}", args.input.display());
    }

    let summary = Pipeline::run(&PipelineConfig {
        input_root: args.input,
        output_root: args.output,
    });

    println!("Series processed: {}", summary.series_total);
    println!("Series succeeded: {}", summary.series_succeeded);
    println!("Files rejected:   {}", summary.files_rejected);
    println!("Files deleted:    {}", summary.files_deleted);
    if summary.deletion_errors > 0 {
        println!("Deletion errors:  {}", summary.deletion_errors);
    }
    for failure in &summary.failures {
        println!(
            "Failed {}/{}: {}",
            failure.subject_id, failure.series_id, failure.error
        );
    }

    if summary.series_total > 0 && summary.series_succeeded == 0 {
        bail!("no series could be reconstructed");
    }
    Ok(())
}
