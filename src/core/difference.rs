use ndarray::Zip;
use tracing::debug;

use crate::core::pairing::MatchedPair;
use crate::error::{Error, Result};
use crate::io::raster::{Raster, RasterReader};

/// Read band 1 of both rasters of `pair` and return their valid differences.
///
/// Each raster is released by the reader before differencing starts.
pub fn extract_pair(reader: &dyn RasterReader, pair: &MatchedPair) -> Result<Vec<f64>> {
    let primary = reader.read_first_band(&pair.primary)?;
    let secondary = reader.read_first_band(&pair.secondary)?;
    let values = difference_samples(&primary, &secondary)?;
    debug!(
        "{}: {} of {} pixels valid",
        pair.base_name,
        values.len(),
        primary.data.len()
    );
    Ok(values)
}

/// Element-wise `primary - secondary` over positions where neither raster holds its
/// no-data sentinel and the difference is finite. Output is in row-major order.
pub fn difference_samples(primary: &Raster, secondary: &Raster) -> Result<Vec<f64>> {
    if primary.shape() != secondary.shape() {
        return Err(Error::ShapeMismatch {
            primary: primary.shape(),
            secondary: secondary.shape(),
        });
    }

    let mut values = Vec::with_capacity(primary.data.len());
    Zip::from(&primary.data)
        .and(&secondary.data)
        .for_each(|&a, &b| {
            let mut valid = true;
            if let Some(nd) = primary.nodata {
                valid &= a != nd;
            }
            if let Some(nd) = secondary.nodata {
                valid &= b != nd;
            }
            let diff = a - b;
            if valid && diff.is_finite() {
                values.push(diff);
            }
        });
    Ok(values)
}
