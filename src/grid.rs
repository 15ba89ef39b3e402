use crate::error::{MeanError, Result};
use crate::io::RasterMetadata;
use gdal::spatial_ref::SpatialRef;
use gdal::GeoTransform;
use log::{debug, warn};
use std::path::Path;

const GEOTRANSFORM_TOLERANCE: f64 = 1e-9;

/// Check that `candidate` can be stacked onto a grid shaped like `template`.
///
/// Differing dimensions are an error. Differing geotransform or CRS only
/// warn: the pixels still line up, they just may not mean the same place.
pub fn check_grid(template: &RasterMetadata, candidate: &RasterMetadata, path: &Path) -> Result<()> {
    if template.dimensions() != candidate.dimensions() {
        return Err(MeanError::ShapeMismatch {
            path: path.to_path_buf(),
            expected: template.dimensions(),
            found: candidate.dimensions(),
        });
    }

    if !same_geotransform(template.geotransform.as_ref(), candidate.geotransform.as_ref()) {
        warn!(
            "{} has geotransform {:?}, first input has {:?}",
            path.display(),
            candidate.geotransform,
            template.geotransform
        );
    }

    if !same_crs(&template.projection, &candidate.projection) {
        warn!("{} has a different CRS than the first input", path.display());
    }

    Ok(())
}

fn same_geotransform(a: Option<&GeoTransform>, b: Option<&GeoTransform>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= GEOTRANSFORM_TOLERANCE),
        (None, None) => true,
        _ => false,
    }
}

/// Compare two WKT strings as spatial references.
///
/// Missing or unparsable CRS on either side is treated as "same"
/// since there is nothing to compare against.
pub fn same_crs(a_wkt: &str, b_wkt: &str) -> bool {
    if a_wkt.is_empty() || b_wkt.is_empty() || a_wkt == b_wkt {
        return true;
    }

    let parsed = SpatialRef::from_wkt(a_wkt).and_then(|a| Ok((a, SpatialRef::from_wkt(b_wkt)?)));
    match parsed {
        Ok((a, b)) => a == b,
        Err(e) => {
            debug!("Skipping CRS comparison, WKT did not parse: {}", e);
            true
        }
    }
}
