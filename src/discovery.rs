use crate::error::{MeanError, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extension matched by [`find_rasters`] (case-sensitive)
pub const RASTER_EXTENSION: &str = ".tif";

/// List `*.tif` files directly inside `dir`, sorted by path.
///
/// No matches, or a folder that does not exist, yields an empty list.
/// Hidden files are skipped, as a shell glob would.
pub fn find_rasters(dir: &Path) -> Result<Vec<PathBuf>> {
    let discovery_err = |source| MeanError::Discovery {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Folder does not exist: {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(discovery_err(e)),
    };

    let mut rasters = Vec::new();
    for entry in entries {
        let entry = entry.map_err(discovery_err)?;
        let path = entry.path();

        if !is_raster_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        if !path.is_file() {
            debug!("Skipping non-file match: {}", path.display());
            continue;
        }
        rasters.push(path);
    }

    rasters.sort();
    info!("Found {} raster(s) in {}", rasters.len(), dir.display());
    Ok(rasters)
}

fn is_raster_name(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(RASTER_EXTENSION)
}
