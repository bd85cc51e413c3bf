//! I/O layer for reading rasters.
//! Provides the `RasterReader` seam, the built-in TIFF reader and, with the
//! `gdal` feature, a GDAL-backed reader.
pub mod raster;
pub use raster::{Raster, RasterError, RasterReader, TiffReader};

#[cfg(feature = "gdal")]
pub mod gdal;
#[cfg(feature = "gdal")]
pub use self::gdal::GdalReader;
