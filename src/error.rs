use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeanError {
    #[error("No input rasters to average")]
    EmptyInput,

    #[error("Cannot open raster {}: {source}", .path.display())]
    RasterOpen {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Cannot write raster {}: {source}", .path.display())]
    RasterWrite {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error(
        "Raster {} is {}x{}, expected {}x{} like the first input",
        .path.display(), .found.0, .found.1, .expected.0, .expected.1
    )]
    ShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Cannot list folder {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, MeanError>;
