//! One comparison loop, two policies.
//!
//! [`run_comparison`] walks the matched pairs, extracts each pair's valid differences
//! and hands them to a [`ComparisonPolicy`]. The policy decides whether an
//! unreadable pair aborts the run and where the samples end up: one report per pair
//! ([`IndividualPolicy`]) or a single report over everything ([`OverallPolicy`]).
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::difference::extract_pair;
use crate::core::pairing::MatchedPair;
use crate::core::params::DiffParams;
use crate::core::stats::SummaryStatistics;
use crate::error::{Error, Result};
use crate::io::raster::RasterReader;
use crate::plot::{HistogramRenderer, PlotSpec};

/// Outcome counters and written files of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Pairs found by the pairer
    pub pairs: usize,
    /// Pairs that produced at least one valid sample
    pub with_data: usize,
    /// Pairs read fine but left with no valid sample after masking
    pub empty: usize,
    /// Pairs skipped because they could not be read or differenced
    pub failed: usize,
    pub outputs: Vec<PathBuf>,
    /// Statistics of the aggregate, when an overall report was produced
    pub overall: Option<SummaryStatistics>,
    /// Number of samples in the aggregate
    pub overall_samples: usize,
}

/// Error isolation and output routing for [`run_comparison`]
pub trait ComparisonPolicy {
    /// Called when a pair cannot be read or differenced. Returning `Err` aborts the run.
    fn extraction_failed(&mut self, pair: &MatchedPair, error: Error) -> Result<()>;

    /// Called with every non-empty difference sample set, in discovery order.
    fn accept(
        &mut self,
        pair: &MatchedPair,
        values: Vec<f64>,
        report: &mut RunReport,
    ) -> Result<()>;

    /// Called once after the last pair.
    fn finish(&mut self, report: &mut RunReport) -> Result<()>;
}

/// Drive `pairs` through extraction and the policy.
pub fn run_comparison(
    pairs: &[MatchedPair],
    reader: &dyn RasterReader,
    policy: &mut dyn ComparisonPolicy,
) -> Result<RunReport> {
    let mut report = RunReport {
        pairs: pairs.len(),
        ..RunReport::default()
    };

    for pair in pairs {
        info!("Processing: {:?} vs {:?}", pair.primary, pair.secondary);
        let values = match extract_pair(reader, pair) {
            Ok(values) => values,
            Err(e) => {
                policy.extraction_failed(pair, e)?;
                report.failed += 1;
                continue;
            }
        };

        if values.is_empty() {
            warn!("No valid data for {}. Skipping.", pair.base_name);
            report.empty += 1;
            continue;
        }

        report.with_data += 1;
        policy.accept(pair, values, &mut report)?;
    }

    policy.finish(&mut report)?;
    Ok(report)
}

/// One report image per pair; any unreadable pair aborts the run.
pub struct IndividualPolicy<'a> {
    params: &'a DiffParams,
    renderer: &'a dyn HistogramRenderer,
}

impl<'a> IndividualPolicy<'a> {
    pub fn new(params: &'a DiffParams, renderer: &'a dyn HistogramRenderer) -> Self {
        Self { params, renderer }
    }
}

impl ComparisonPolicy for IndividualPolicy<'_> {
    fn extraction_failed(&mut self, pair: &MatchedPair, error: Error) -> Result<()> {
        warn!("Aborting: could not process {}: {}", pair.base_name, error);
        Err(error)
    }

    fn accept(
        &mut self,
        pair: &MatchedPair,
        values: Vec<f64>,
        report: &mut RunReport,
    ) -> Result<()> {
        let stats = SummaryStatistics::compute(&values)?;
        let spec = PlotSpec::per_pair(pair, self.params.bins, self.params.dpi);
        let output = self.params.pair_output_path(&pair.base_name);
        self.renderer.render(&values, &stats, &spec, &output)?;
        report.outputs.push(output);
        Ok(())
    }

    fn finish(&mut self, report: &mut RunReport) -> Result<()> {
        info!("Reports written: {}", report.outputs.len());
        Ok(())
    }
}

/// One report image over the concatenation of every pair's samples; unreadable
/// pairs are logged and skipped.
pub struct OverallPolicy<'a> {
    params: &'a DiffParams,
    renderer: &'a dyn HistogramRenderer,
    aggregate: Vec<f64>,
}

impl<'a> OverallPolicy<'a> {
    pub fn new(params: &'a DiffParams, renderer: &'a dyn HistogramRenderer) -> Self {
        Self {
            params,
            renderer,
            aggregate: Vec::new(),
        }
    }

    /// Samples accumulated so far, in discovery order
    pub fn aggregate(&self) -> &[f64] {
        &self.aggregate
    }
}

impl ComparisonPolicy for OverallPolicy<'_> {
    fn extraction_failed(&mut self, pair: &MatchedPair, error: Error) -> Result<()> {
        if !error.is_pair_failure() {
            return Err(error);
        }
        warn!("{}", skip_message(pair, &error));
        Ok(())
    }

    fn accept(
        &mut self,
        _pair: &MatchedPair,
        mut values: Vec<f64>,
        _report: &mut RunReport,
    ) -> Result<()> {
        self.aggregate.append(&mut values);
        Ok(())
    }

    fn finish(&mut self, report: &mut RunReport) -> Result<()> {
        report.overall_samples = self.aggregate.len();
        if self.aggregate.is_empty() {
            warn!("No valid pixel data was collected from any file.");
            return Ok(());
        }

        let stats = SummaryStatistics::compute(&self.aggregate)?;
        info!(
            "Overall: {} samples, mean={:.3} sd={:.3}",
            self.aggregate.len(),
            stats.mean,
            stats.std_dev
        );
        let spec = PlotSpec::overall(self.params.bins, self.params.dpi);
        let output = self.params.overall_output_path();
        self.renderer.render(&self.aggregate, &stats, &spec, &output)?;
        report.outputs.push(output);
        report.overall = Some(stats);
        Ok(())
    }
}

fn skip_message(pair: &MatchedPair, error: &Error) -> String {
    match error {
        Error::ShapeMismatch { .. } => {
            format!("Shape mismatch for {}. Skipping. ({})", pair.base_name, error)
        }
        _ => format!(
            "Could not open one or both files for {}. Skipping. ({})",
            pair.base_name, error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::raster::{Raster, RasterError};
    use ndarray::array;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    /// Rasters served from memory; unknown paths fail like a missing file.
    #[derive(Default)]
    struct MemoryReader {
        rasters: HashMap<PathBuf, Raster>,
    }

    impl MemoryReader {
        fn with(mut self, path: &str, raster: Raster) -> Self {
            self.rasters.insert(PathBuf::from(path), raster);
            self
        }
    }

    impl RasterReader for MemoryReader {
        fn read_first_band(&self, path: &Path) -> std::result::Result<Raster, RasterError> {
            self.rasters
                .get(path)
                .cloned()
                .ok_or_else(|| RasterError::Open {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(PathBuf, String, Vec<f64>, SummaryStatistics)>>,
    }

    impl HistogramRenderer for RecordingRenderer {
        fn render(
            &self,
            values: &[f64],
            stats: &SummaryStatistics,
            spec: &PlotSpec,
            output: &Path,
        ) -> Result<()> {
            self.calls.borrow_mut().push((
                output.to_path_buf(),
                spec.title.clone(),
                values.to_vec(),
                *stats,
            ));
            Ok(())
        }
    }

    fn pair(base: &str) -> MatchedPair {
        MatchedPair {
            base_name: base.to_string(),
            primary: PathBuf::from(format!("in1/{base}.tif")),
            secondary: PathBuf::from(format!("in2/{base}.tiff")),
        }
    }

    fn params() -> DiffParams {
        DiffParams {
            output_dir: PathBuf::from("out"),
            ..DiffParams::default()
        }
    }

    fn reader() -> MemoryReader {
        MemoryReader::default()
            .with("in1/a.tif", Raster::new(array![[5.0, 5.0], [5.0, 5.0]], None))
            .with("in2/a.tiff", Raster::new(array![[3.0, 3.0], [3.0, 3.0]], None))
            .with(
                "in1/b.tif",
                Raster::new(array![[10.0, -9999.0], [10.0, 10.0]], Some(-9999.0)),
            )
            .with("in2/b.tiff", Raster::new(array![[7.0, 7.0], [7.0, 7.0]], None))
            .with("in1/empty.tif", Raster::new(array![[0.0, 0.0]], Some(0.0)))
            .with("in2/empty.tiff", Raster::new(array![[1.0, 2.0]], None))
            .with("in1/only.tif", Raster::new(array![[1.0]], None))
    }

    #[test]
    fn individual_renders_each_pair() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = IndividualPolicy::new(&params, &renderer);
        let pairs = [pair("a"), pair("empty"), pair("b")];

        let report = run_comparison(&pairs, &reader(), &mut policy).unwrap();

        assert_eq!(report.pairs, 3);
        assert_eq!(report.with_data, 2);
        assert_eq!(report.empty, 1);
        assert_eq!(
            report.outputs,
            vec![
                PathBuf::from("out/diff_distribution_a.png"),
                PathBuf::from("out/diff_distribution_b.png"),
            ]
        );

        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, "Distribution of Pixel Differences of a.tif");
        assert_eq!(calls[0].2, vec![2.0; 4]);
        assert_eq!(calls[0].3.mean, 2.0);
        assert_eq!(calls[0].3.mode, 2.0);
        assert_eq!(calls[0].3.variance, 0.0);
        assert_eq!(calls[1].2, vec![3.0; 3]);
        assert_eq!(calls[1].3.mean, 3.0);
    }

    #[test]
    fn individual_aborts_on_missing_counterpart() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = IndividualPolicy::new(&params, &renderer);
        let pairs = [pair("a"), pair("only"), pair("b")];

        let err = run_comparison(&pairs, &reader(), &mut policy).unwrap_err();

        assert!(matches!(err, Error::Raster(RasterError::Open { .. })));
        // The pair before the failure was already reported; nothing after it
        assert_eq!(renderer.calls.borrow().len(), 1);
    }

    #[test]
    fn individual_aborts_on_shape_mismatch() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = IndividualPolicy::new(&params, &renderer);
        let reader = reader().with("in2/only.tiff", Raster::new(array![[1.0, 2.0]], None));

        let err = run_comparison(&[pair("only")], &reader, &mut policy).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn overall_skips_failures_and_aggregates_in_order() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = OverallPolicy::new(&params, &renderer);
        let pairs = [pair("b"), pair("only"), pair("empty"), pair("a")];

        let report = run_comparison(&pairs, &reader(), &mut policy).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.with_data, 2);
        assert_eq!(report.overall_samples, 7);
        assert_eq!(policy.aggregate(), &[3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 2.0]);
        assert_eq!(
            report.outputs,
            vec![PathBuf::from("out/Overall_Diff_Distribution.png")]
        );

        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, crate::plot::OVERALL_TITLE);
        assert_eq!(calls[0].2.len(), 7);
        let stats = report.overall.unwrap();
        assert_eq!(stats, calls[0].3);
        assert_eq!(stats.mode, 2.0);
        assert!((stats.mean - 17.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn overall_skip_message_names_the_cause() {
        let mismatch = Error::ShapeMismatch {
            primary: (2, 2),
            secondary: (1, 2),
        };
        let message = skip_message(&pair("a"), &mismatch);
        assert!(message.starts_with("Shape mismatch for a. Skipping."));
        assert!(!message.contains("Could not open"));

        let missing = Error::Raster(RasterError::Open {
            path: PathBuf::from("in2/a.tiff"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert!(
            skip_message(&pair("a"), &missing)
                .starts_with("Could not open one or both files for a. Skipping.")
        );
    }

    #[test]
    fn overall_skips_shape_mismatch() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = OverallPolicy::new(&params, &renderer);
        let reader = reader().with("in2/only.tiff", Raster::new(array![[1.0, 2.0]], None));

        let report = run_comparison(&[pair("only"), pair("a")], &reader, &mut policy).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.overall_samples, 4);
    }

    #[test]
    fn overall_without_data_writes_nothing() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = OverallPolicy::new(&params, &renderer);
        let pairs = [pair("only"), pair("empty"), pair("ghost")];

        let report = run_comparison(&pairs, &reader(), &mut policy).unwrap();

        assert_eq!(report.failed, 2);
        assert_eq!(report.empty, 1);
        assert!(report.outputs.is_empty());
        assert!(report.overall.is_none());
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn no_pairs_is_not_an_error() {
        let params = params();
        let renderer = RecordingRenderer::default();
        let mut policy = OverallPolicy::new(&params, &renderer);
        let report = run_comparison(&[], &reader(), &mut policy).unwrap();
        assert_eq!(report, RunReport::default());
    }
}
