use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// Errors encountered when opening or decoding a raster
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
    #[error("Unsupported raster {path:?}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// First band of a raster, widened to f64, plus its declared no-data sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Samples in (rows, columns) order
    pub data: Array2<f64>,
    pub nodata: Option<f64>,
}

impl Raster {
    pub fn new(data: Array2<f64>, nodata: Option<f64>) -> Self {
        Self { data, nodata }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Anything that can load band 1 of a raster file.
///
/// Implementations must release the underlying file handle before returning.
pub trait RasterReader {
    fn read_first_band(&self, path: &Path) -> Result<Raster, RasterError>;
}

/// Pure-Rust GeoTIFF reader.
///
/// The no-data sentinel comes from the `GDAL_NODATA` ASCII tag, which is how GDAL
/// and rasterio persist it in TIFF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiffReader;

impl TiffReader {
    pub fn new() -> Self {
        Self
    }
}

impl RasterReader for TiffReader {
    fn read_first_band(&self, path: &Path) -> Result<Raster, RasterError> {
        let file = File::open(path).map_err(|source| RasterError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decode_err = |source| RasterError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(decode_err)?
            .with_limits(decoder_limits());
        let (width, height) = decoder.dimensions().map_err(decode_err)?;
        let nodata = match decoder.find_tag(Tag::GdalNodata).map_err(decode_err)? {
            Some(value) => parse_nodata(&value.into_string().map_err(decode_err)?),
            None => None,
        };
        let samples = decoding_result_to_f64(decoder.read_image().map_err(decode_err)?);

        let (cols, rows) = (width as usize, height as usize);
        let pixels = cols * rows;
        if pixels == 0 || samples.len() < pixels || samples.len() % pixels != 0 {
            return Err(RasterError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!(
                    "{} samples do not tile a {}x{} grid",
                    samples.len(),
                    cols,
                    rows
                ),
            });
        }
        // Chunky layout: band 1 is the first sample of every pixel
        let samples_per_pixel = samples.len() / pixels;
        let band: Vec<f64> = if samples_per_pixel == 1 {
            samples
        } else {
            samples.into_iter().step_by(samples_per_pixel).collect()
        };

        debug!(
            "Read {:?}: {}x{}, {} sample(s)/pixel, nodata={:?}",
            path, cols, rows, samples_per_pixel, nodata
        );

        let data = Array2::from_shape_vec((rows, cols), band).map_err(|e| {
            RasterError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(Raster::new(data, nodata))
    }
}

/// Whole bands are loaded into memory, so the decoder gets no buffer cap beyond
/// what the allocation itself allows.
fn decoder_limits() -> Limits {
    Limits::unlimited()
}

fn parse_nodata(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    match trimmed.to_ascii_lowercase().as_str() {
        "" => None,
        "nan" => Some(f64::NAN),
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        other => other.parse::<f64>().ok(),
    }
}

fn decoding_result_to_f64(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F16(v) => v.into_iter().map(|x| f64::from(x.to_f32())).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    }
}
