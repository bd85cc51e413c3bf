#![doc = r#"
RASTERDIFF — pixel-wise difference statistics for pairs of GeoTIFF rasters.

Every `*.tif` in a primary directory is paired with the `<base>.tiff` of the same
name in a secondary directory. For each pair the first band of both rasters is
differenced (`primary - secondary`), no-data and non-finite positions are masked
out, and the distribution of the remaining differences is summarised (mean, mode,
population variance, standard deviation) and drawn as a density histogram with a
kernel-density overlay.

Two modes share one pipeline:

- `Individual`: one `diff_distribution_<base>.png` per pair. The first pair that
  cannot be read aborts the run.
- `Overall`: one `Overall_Diff_Distribution.png` over the concatenation of all
  pairs. Unreadable pairs are logged and skipped.

Requirements
------------
- Rust 2024 edition toolchain.
- With the `gdal` feature: GDAL development headers and runtime.

Quick start
-----------
```rust,no_run
use rasterdiff::{DiffParams, RunMode, api};

fn main() -> rasterdiff::Result<()> {
    let params = DiffParams {
        mode: RunMode::Overall,
        ..DiffParams::default()
    };
    let report = api::run(&params)?;
    println!("pairs={} failed={} outputs={:?}", report.pairs, report.failed, report.outputs);
    Ok(())
}
```

Custom collaborators
--------------------
The raster decoder and the plot backend sit behind the [`RasterReader`] and
[`HistogramRenderer`] traits; pass your own to [`api::run_with`].

Mode
----
The reported mode is the most frequent *exact* value. On continuous data almost
every difference is unique, so it tends to the smallest difference; it is only
meaningful for integer-valued rasters.

Feature flags
-------------
- `gdal`: read rasters through GDAL instead of the built-in TIFF decoder.

Useful modules
--------------
- [`api`] — high-level entry points.
- [`core`] — pairing, differencing, statistics and the comparison loop.
- [`io`] — raster readers.
- [`plot`] — histogram binning, KDE and PNG rendering.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod plot;
pub mod types;

// Curated public API surface
pub use crate::core::difference::{difference_samples, extract_pair};
pub use crate::core::pairing::{MatchedPair, discover_pairs};
pub use crate::core::params::DiffParams;
pub use crate::core::pipeline::{
    ComparisonPolicy, IndividualPolicy, OverallPolicy, RunReport, run_comparison,
};
pub use crate::core::stats::{SummaryStatistics, exact_mode};
pub use error::{Error, Result};
pub use types::RunMode;

pub use io::{Raster, RasterError, RasterReader, TiffReader};
#[cfg(feature = "gdal")]
pub use io::GdalReader;

pub use plot::{HistogramRenderer, PlotSpec, PlottersRenderer};
