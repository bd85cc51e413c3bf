use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;
use tracing::debug;

use super::raster::{Raster, RasterError, RasterReader};

/// Reader for generic geospatial formats via GDAL (GeoTIFF, NetCDF, HDF5, ENVI, ...)
#[derive(Debug, Default, Clone, Copy)]
pub struct GdalReader;

impl GdalReader {
    pub fn new() -> Self {
        Self
    }
}

impl RasterReader for GdalReader {
    /// Read band 1 as an f64 ndarray of shape (height, width). The dataset is
    /// closed when it goes out of scope at the end of this call.
    fn read_first_band(&self, path: &Path) -> Result<Raster, RasterError> {
        let dataset = Dataset::open(path)?;
        if dataset.raster_count() == 0 {
            return Err(RasterError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "No raster bands found".into(),
            });
        }
        let (size_x, size_y) = dataset.raster_size();
        let band = dataset.rasterband(1)?;
        let nodata = band.no_data_value();

        let window = (size_x, size_y);
        let buf = band.read_as::<f64>((0, 0), window, window, None)?;
        let array = Array2::from_shape_vec((size_y, size_x), buf.data().to_vec()).map_err(|e| {
            RasterError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            "GDAL read {:?}: {}x{}, nodata={:?}",
            path, size_x, size_y, nodata
        );
        Ok(Raster::new(array, nodata))
    }
}
