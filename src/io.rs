use crate::error::{MeanError, Result};
use gdal::raster::{Buffer, GdalDataType};
use gdal::{Dataset, DriverManager, GeoTransform};
use log::{debug, info, warn};
use ndarray::Array2;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// GDAL short driver name, e.g. "GTiff"
    pub driver: String,
    pub width: usize,
    pub height: usize,
    pub band_type: GdalDataType,
    /// WKT, empty when the dataset carries no CRS
    pub projection: String,
    pub geotransform: Option<GeoTransform>,
    pub nodata: Option<f64>,
    pub band_count: usize,
}

impl RasterMetadata {
    /// Metadata for the averaged output: identical except for Float32 samples
    pub fn for_output(&self) -> RasterMetadata {
        RasterMetadata {
            band_type: GdalDataType::Float32,
            ..self.clone()
        }
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Band 1 of an input raster, copied out of the dataset
#[derive(Debug, Clone)]
pub struct RasterGrid {
    pub data: Array2<f64>,
    pub metadata: RasterMetadata,
}

/// Read band 1 of a raster as f64 together with its metadata.
///
/// The dataset is closed before this returns, whether or not the read succeeded.
pub fn read_input_raster(path: &Path) -> Result<RasterGrid> {
    info!("Opening input raster: {}", path.display());

    let (metadata, values) = read_band_values(path).map_err(|source| MeanError::RasterOpen {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "{}: {}x{} {} ({} band(s), nodata={:?})",
        path.display(),
        metadata.width,
        metadata.height,
        metadata.band_type,
        metadata.band_count,
        metadata.nodata
    );

    let data = Array2::from_shape_vec((metadata.height, metadata.width), values)?;
    Ok(RasterGrid { data, metadata })
}

fn read_band_values(path: &Path) -> gdal::errors::Result<(RasterMetadata, Vec<f64>)> {
    let dataset = Dataset::open(path)?;
    let metadata = extract_metadata_from_dataset(&dataset)?;

    let rasterband = dataset.rasterband(1)?;
    let size = (metadata.width, metadata.height);
    let buffer = rasterband.read_as::<f64>((0, 0), size, size, None)?;
    let (_, values) = buffer.into_shape_and_vec();

    Ok((metadata, values))
}

/// Extract metadata from a dataset without reading pixel data
pub fn extract_metadata_from_dataset(dataset: &Dataset) -> gdal::errors::Result<RasterMetadata> {
    let rasterband = dataset.rasterband(1)?;
    let (width, height) = rasterband.size();

    // Datasets without georeferencing report an error here; carry that as None
    let geotransform = match dataset.geo_transform() {
        Ok(gt) => Some(gt),
        Err(e) => {
            debug!("No geotransform: {}", e);
            None
        }
    };

    Ok(RasterMetadata {
        driver: dataset.driver().short_name(),
        width,
        height,
        band_type: rasterband.band_type(),
        projection: dataset.projection(),
        geotransform,
        nodata: rasterband.no_data_value(),
        band_count: dataset.raster_count(),
    })
}

/// Write the mean grid as band 1 of a new Float32 raster, overwriting `path`.
///
/// The driver, band count, georeferencing and nodata value come from `metadata`.
pub fn write_mean_output(path: &Path, mean: &Array2<f32>, metadata: &RasterMetadata) -> Result<()> {
    info!("Creating output raster: {}", path.display());

    if metadata.band_count > 1 {
        warn!(
            "First input has {} bands; output keeps that count but only band 1 holds the mean",
            metadata.band_count
        );
    }

    write_dataset(path, mean, metadata).map_err(|source| MeanError::RasterWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote {}x{} Float32 raster to {}",
        metadata.width,
        metadata.height,
        path.display()
    );
    Ok(())
}

fn write_dataset(
    path: &Path,
    mean: &Array2<f32>,
    metadata: &RasterMetadata,
) -> gdal::errors::Result<()> {
    let driver = DriverManager::get_driver_by_name(&metadata.driver)?;
    let band_count = metadata.band_count.max(1);

    let mut dataset = driver.create_with_band_type::<f32, _>(
        path,
        metadata.width,
        metadata.height,
        band_count,
    )?;

    if let Some(geotransform) = &metadata.geotransform {
        dataset.set_geo_transform(geotransform)?;
    }
    if !metadata.projection.is_empty() {
        dataset.set_projection(&metadata.projection)?;
    }

    if metadata.nodata.is_some() {
        for band_index in 1..=band_count {
            let mut raster_band = dataset.rasterband(band_index)?;
            raster_band.set_no_data_value(metadata.nodata)?;
        }
    }

    // Array2 iteration is row-major, which is the layout GDAL expects
    let mut buffer = Buffer::new(
        (metadata.width, metadata.height),
        mean.iter().copied().collect(),
    );
    let mut raster_band = dataset.rasterband(1)?;
    raster_band.write((0, 0), (metadata.width, metadata.height), &mut buffer)?;

    debug!("Band 1 written, {} band(s) total", band_count);
    Ok(())
}
