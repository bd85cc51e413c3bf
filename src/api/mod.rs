//! High-level, ergonomic library API: discover pairs under the configured
//! directories and run the individual or overall comparison with the built-in
//! reader and renderer. Prefer these entrypoints over the `core` modules when
//! embedding RASTERDIFF.
use tracing::info;

use crate::core::pairing::discover_pairs;
use crate::core::params::DiffParams;
use crate::core::pipeline::{
    ComparisonPolicy, IndividualPolicy, OverallPolicy, RunReport, run_comparison,
};
use crate::error::Result;
use crate::io::raster::RasterReader;
use crate::plot::{HistogramRenderer, PlottersRenderer};
use crate::types::RunMode;

/// Raster reader selected by the enabled cargo features
pub fn default_reader() -> Box<dyn RasterReader> {
    #[cfg(feature = "gdal")]
    {
        Box::new(crate::io::GdalReader::new())
    }
    #[cfg(not(feature = "gdal"))]
    {
        Box::new(crate::io::TiffReader::new())
    }
}

/// Run the comparison described by `params` with the default reader and renderer
pub fn run(params: &DiffParams) -> Result<RunReport> {
    let reader = default_reader();
    run_with(params, reader.as_ref(), &PlottersRenderer::new())
}

/// Run the comparison described by `params` with caller-supplied collaborators
pub fn run_with(
    params: &DiffParams,
    reader: &dyn RasterReader,
    renderer: &dyn HistogramRenderer,
) -> Result<RunReport> {
    params.validate()?;
    let pairs = discover_pairs(params)?;
    info!(
        "{} mode: {} pair(s) found in {:?}",
        params.mode,
        pairs.len(),
        params.primary_dir
    );

    let mut individual;
    let mut overall;
    let policy: &mut dyn ComparisonPolicy = match params.mode {
        RunMode::Individual => {
            individual = IndividualPolicy::new(params, renderer);
            &mut individual
        }
        RunMode::Overall => {
            overall = OverallPolicy::new(params, renderer);
            &mut overall
        }
    };
    run_comparison(&pairs, reader, policy)
}

/// One histogram per matched pair; the first unreadable pair aborts
pub fn compare_individual(params: &DiffParams) -> Result<RunReport> {
    run(&DiffParams {
        mode: RunMode::Individual,
        ..params.clone()
    })
}

/// One histogram over all matched pairs; unreadable pairs are skipped
pub fn compare_overall(params: &DiffParams) -> Result<RunReport> {
    run(&DiffParams {
        mode: RunMode::Overall,
        ..params.clone()
    })
}
