// Library exports for testing and reuse

pub mod cli;
pub mod discovery;
pub mod error;
pub mod grid;
pub mod io;
pub mod mean;
pub mod request;

// Re-export commonly used types
pub use discovery::find_rasters;
pub use error::{MeanError, Result};
pub use io::{read_input_raster, write_mean_output, RasterGrid, RasterMetadata};
pub use mean::{compute_mean, MeanAccumulator, MeanSummary, NodataPolicy};
pub use request::{handle_request, MeanRequest, Status};
