//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O and raster reader errors, and provides semantic variants
//! for argument validation, shape checks and rendering failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Raster reader error: {0}")]
    Raster(#[from] crate::io::RasterError),

    #[error(
        "Raster shape mismatch: primary is {}x{}, secondary is {}x{}",
        .primary.0, .primary.1, .secondary.0, .secondary.1
    )]
    ShapeMismatch {
        primary: (usize, usize),
        secondary: (usize, usize),
    },

    #[error("Cannot compute statistics of an empty sample set")]
    EmptySampleSet,

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub fn render<E: std::fmt::Display>(e: E) -> Self {
        Error::Render(e.to_string())
    }

    /// True for failures that belong to one pair's input rasters rather than
    /// to the run as a whole.
    pub fn is_pair_failure(&self) -> bool {
        matches!(self, Error::Raster(_) | Error::ShapeMismatch { .. })
    }
}
