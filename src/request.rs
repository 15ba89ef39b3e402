use crate::discovery::find_rasters;
use crate::error::Result;
use crate::mean::{compute_mean, MeanSummary, NodataPolicy};
use log::{error, info};
use std::fmt;
use std::path::{Path, PathBuf};

/// One "run" action: a folder of rasters to average and where to put the result
#[derive(Debug, Clone, Default)]
pub struct MeanRequest {
    pub input_folder: String,
    pub output_file: String,
    pub nodata_policy: NodataPolicy,
}

/// Status line shown to the user after a request
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Nothing has been run yet
    Idle,
    MissingPaths,
    NoFilesFound { folder: String },
    Saved { output: PathBuf },
    Failed { message: String },
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Saved { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => Ok(()),
            Status::MissingPaths => {
                write!(f, "Please provide both the input folder and the output file path.")
            }
            Status::NoFilesFound { folder } => write!(f, "No .tif files found in folder: {}", folder),
            Status::Saved { output } => write!(f, "Mean raster saved to {}", output.display()),
            Status::Failed { message } => write!(f, "Processing failed: {}", message),
        }
    }
}

/// Run a request end to end. Every anticipated failure becomes a [`Status`].
pub fn handle_request(request: &MeanRequest) -> Status {
    let folder = request.input_folder.as_str();
    let output = request.output_file.as_str();

    // Whitespace only counts as blank; otherwise the paths are used verbatim
    if folder.trim().is_empty() || output.trim().is_empty() {
        return Status::MissingPaths;
    }

    match run(Path::new(folder), Path::new(output), request.nodata_policy) {
        Ok(Some(summary)) => {
            info!(
                "Averaged {} raster(s) of {}x{}",
                summary.file_count, summary.width, summary.height
            );
            Status::Saved {
                output: summary.output,
            }
        }
        Ok(None) => Status::NoFilesFound {
            folder: folder.to_string(),
        },
        Err(e) => {
            error!("{}", e);
            Status::Failed {
                message: e.to_string(),
            }
        }
    }
}

fn run(folder: &Path, output: &Path, policy: NodataPolicy) -> Result<Option<MeanSummary>> {
    let rasters = find_rasters(folder)?;
    if rasters.is_empty() {
        return Ok(None);
    }
    compute_mean(&rasters, output, policy).map(Some)
}
