use crate::error::{MeanError, Result};
use crate::grid::check_grid;
use crate::io::{read_input_raster, write_mean_output, RasterGrid, RasterMetadata};
use gdal::raster::GdalDataType;
use log::{debug, info};
use ndarray::{Array2, Zip};
use std::path::{Path, PathBuf};

/// How nodata-valued pixels take part in the mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodataPolicy {
    /// Nodata sentinels are averaged like any other value
    #[default]
    Include,
    /// Nodata pixels are skipped and each pixel is divided by its own valid count.
    /// Pixels with no valid sample come out as the nodata value.
    Exclude,
}

/// Outcome of a successful [`compute_mean`]
#[derive(Debug, Clone, PartialEq)]
pub struct MeanSummary {
    pub output: PathBuf,
    pub file_count: usize,
    pub width: usize,
    pub height: usize,
}

/// Running per-pixel sum over a stack of same-shaped grids
pub struct MeanAccumulator {
    sum: Array2<f64>,
    // Per-pixel sample count, only kept when nodata pixels are skipped
    valid: Option<Array2<u32>>,
    nodata: Option<f64>,
    count: usize,
    metadata: RasterMetadata,
}

impl MeanAccumulator {
    /// Start a stack from the first grid; its metadata becomes the template.
    pub fn new(first: RasterGrid, policy: NodataPolicy) -> Self {
        let RasterGrid { data, metadata } = first;

        let skip_value = match policy {
            NodataPolicy::Include => None,
            NodataPolicy::Exclude => metadata
                .nodata
                .map(|nd| sample_sentinel(nd, metadata.band_type)),
        };

        let (sum, valid) = match skip_value {
            None => (data, None),
            Some(nd) => {
                let valid = data.mapv(|v| u32::from(!is_nodata(v, nd)));
                let sum = data.mapv(|v| if is_nodata(v, nd) { 0.0 } else { v });
                (sum, Some(valid))
            }
        };

        Self {
            sum,
            valid,
            nodata: skip_value,
            count: 1,
            metadata,
        }
    }

    /// Add one more grid. `path` is only used to name the grid in errors.
    pub fn add(&mut self, grid: &RasterGrid, path: &Path) -> Result<()> {
        check_grid(&self.metadata, &grid.metadata, path)?;

        match (&mut self.valid, self.nodata) {
            (Some(valid), Some(nd)) => {
                Zip::from(&mut self.sum)
                    .and(valid)
                    .and(&grid.data)
                    .for_each(|s, c, &v| {
                        if !is_nodata(v, nd) {
                            *s += v;
                            *c += 1;
                        }
                    });
            }
            _ => self.sum += &grid.data,
        }

        self.count += 1;
        Ok(())
    }

    /// Number of grids added so far, including the first
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.metadata
    }

    /// Divide the sums and hand back the f32 mean with output metadata
    pub fn finish(self) -> (Array2<f32>, RasterMetadata) {
        let mean = match (self.valid, self.nodata) {
            (Some(valid), Some(nd)) => Zip::from(&self.sum)
                .and(&valid)
                .map_collect(|&s, &c| if c > 0 { (s / c as f64) as f32 } else { nd as f32 }),
            _ => {
                let n = self.count as f64;
                self.sum.mapv(|s| (s / n) as f32)
            }
        };

        (mean, self.metadata.for_output())
    }
}

/// Nodata as it actually appears in the samples of a band of `band_type`.
///
/// Float32 pixels widened to f64 only match a sentinel that is itself an f32.
fn sample_sentinel(nodata: f64, band_type: GdalDataType) -> f64 {
    match band_type {
        GdalDataType::Float32 => nodata as f32 as f64,
        _ => nodata,
    }
}

fn is_nodata(value: f64, nodata: f64) -> bool {
    if nodata.is_nan() {
        value.is_nan()
    } else {
        value == nodata
    }
}

/// Average band 1 of every raster in `input_paths` and write the result to `output_path`.
///
/// Inputs are read one at a time, so memory holds the running sum plus one input.
/// The output keeps the first input's metadata with Float32 samples.
pub fn compute_mean<P: AsRef<Path>>(
    input_paths: &[P],
    output_path: &Path,
    policy: NodataPolicy,
) -> Result<MeanSummary> {
    let (first, rest) = input_paths.split_first().ok_or(MeanError::EmptyInput)?;

    info!(
        "Averaging {} raster(s) (nodata policy: {:?})",
        input_paths.len(),
        policy
    );

    let mut accumulator = MeanAccumulator::new(read_input_raster(first.as_ref())?, policy);

    for path in rest {
        let path = path.as_ref();
        let grid = read_input_raster(path)?;
        accumulator.add(&grid, path)?;
        debug!("Accumulated {} of {}", accumulator.count(), input_paths.len());
    }

    let file_count = accumulator.count();
    let (mean, metadata) = accumulator.finish();
    write_mean_output(output_path, &mean, &metadata)?;

    Ok(MeanSummary {
        output: output_path.to_path_buf(),
        file_count,
        width: metadata.width,
        height: metadata.height,
    })
}
