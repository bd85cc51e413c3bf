use clap::Parser;
use std::path::PathBuf;

use rasterdiff::RunMode;
use rasterdiff::core::params::{
    DEFAULT_BINS, DEFAULT_DPI, DEFAULT_OUTPUT_DIR, DEFAULT_PRIMARY_DIR, DEFAULT_PRIMARY_EXT,
    DEFAULT_SECONDARY_DIR, DEFAULT_SECONDARY_EXT,
};

#[derive(Parser, Debug)]
#[command(name = "rasterdiff", version, about = "Raster difference distribution reports")]
pub struct CliArgs {
    /// Report mode: one plot per pair (individual) or one over all pairs (overall)
    #[arg(short, long, value_enum, default_value_t = RunMode::Individual)]
    pub mode: RunMode,

    /// Directory scanned for primary rasters
    #[arg(long, default_value = DEFAULT_PRIMARY_DIR)]
    pub primary_dir: PathBuf,

    /// Directory holding the secondary counterparts
    #[arg(long, default_value = DEFAULT_SECONDARY_DIR)]
    pub secondary_dir: PathBuf,

    /// Output directory for PNG reports
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Extension of primary rasters
    #[arg(long, default_value = DEFAULT_PRIMARY_EXT)]
    pub primary_ext: String,

    /// Extension of secondary rasters
    #[arg(long, default_value = DEFAULT_SECONDARY_EXT)]
    pub secondary_ext: String,

    /// Histogram bin count
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Output resolution in DPI
    #[arg(long, default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Print the run report as JSON on completion
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
