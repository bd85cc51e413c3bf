use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use super::histogram::{DensityHistogram, gaussian_kde};
use super::{HistogramRenderer, PlotSpec};
use crate::core::stats::SummaryStatistics;
use crate::error::{Error, Result};

const KDE_GRID_POINTS: usize = 200;

/// PNG renderer on the plotters bitmap backend
#[derive(Debug, Default, Clone, Copy)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl HistogramRenderer for PlottersRenderer {
    fn render(
        &self,
        values: &[f64],
        stats: &SummaryStatistics,
        spec: &PlotSpec,
        output: &Path,
    ) -> Result<()> {
        let hist = DensityHistogram::compute(values, spec.bins).ok_or(Error::EmptySampleSet)?;
        let kde = gaussian_kde(values, KDE_GRID_POINTS);
        if kde.is_none() {
            debug!("No spread in {} samples, skipping KDE overlay", values.len());
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        draw_report(&hist, kde.as_deref(), stats, spec, output).map_err(Error::render)?;
        info!("Plot saved to: {:?}", output);
        Ok(())
    }
}

fn draw_report(
    hist: &DensityHistogram,
    kde: Option<&[(f64, f64)]>,
    stats: &SummaryStatistics,
    spec: &PlotSpec,
    output: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let px = |pt: f64| spec.pt_to_px(pt).round() as u32;
    let font = |pt: f64| spec.pt_to_px(pt);

    let root = BitMapBackend::new(output, spec.pixel_size()).into_drawing_area();
    root.fill(&WHITE)?;

    let kde_peak = kde
        .map(|c| c.iter().map(|&(_, y)| y).fold(0.0, f64::max))
        .unwrap_or(0.0);
    let y_max = hist.max_density().max(kde_peak) * 1.05;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    // Small fixed margins stand in for tight bounding-box cropping
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", font(12.0)))
        .margin(px(4.0))
        .x_label_area_size(px(28.0))
        .y_label_area_size(px(40.0))
        .build_cartesian_2d(hist.lo..hist.hi, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Pixel Difference Value")
        .y_desc("Density")
        .label_style(("sans-serif", font(9.0)))
        .axis_desc_style(("sans-serif", font(10.0)))
        .bold_line_style(BLACK.mix(0.15).stroke_width(1))
        .light_line_style(WHITE.stroke_width(1))
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_label_formatter(&|y| format!("{y:.3}"))
        .draw()?;

    let (r, g, b) = spec.bar_rgb;
    let bar = RGBColor(r, g, b);

    chart.draw_series(
        hist.bars()
            .map(|(x0, x1, d)| Rectangle::new([(x0, 0.0), (x1, d)], bar.mix(0.55).filled())),
    )?;
    chart.draw_series(
        hist.bars()
            .map(|(x0, x1, d)| Rectangle::new([(x0, 0.0), (x1, d)], bar.stroke_width(1))),
    )?;

    if let Some(curve) = kde {
        chart.draw_series(LineSeries::new(
            curve.iter().copied(),
            bar.stroke_width(px(1.5).max(1)),
        ))?;
    }

    let plot_area = chart.plotting_area().strip_coord_spec();
    draw_stats_box(&plot_area, &stats.annotation(), spec)?;

    root.present()?;
    Ok(())
}

/// White box anchored at the top-right corner of `area` holding one line per statistic.
fn draw_stats_box(
    area: &DrawingArea<BitMapBackend, Shift>,
    text: &str,
    spec: &PlotSpec,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let font_px = spec.pt_to_px(spec.font_pt);
    let style = TextStyle::from(("sans-serif", font_px).into_font()).color(&BLACK);

    let lines: Vec<&str> = text.lines().collect();
    let mut text_width = 0u32;
    for line in &lines {
        let (w, _) = area.estimate_text_size(line, &style)?;
        text_width = text_width.max(w);
    }

    let (w, h) = area.dim_in_pixel();
    let pad = (font_px * 0.5).round() as i32;
    let line_height = (font_px * 1.25).round() as i32;
    // Anchor at 98% across and 98% up, as fractions of the plot area
    let right = (w as f64 * 0.98).round() as i32;
    let top = (h as f64 * 0.02).round() as i32;
    let left = right - text_width as i32 - 2 * pad;
    let bottom = top + line_height * lines.len() as i32 + 2 * pad;

    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        WHITE.mix(spec.box_opacity).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        BLACK.mix(0.4).stroke_width(1),
    ))?;
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            *line,
            (left + pad, top + pad + i as i32 * line_height),
            style.clone(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairing::MatchedPair;
    use std::path::PathBuf;

    fn samples() -> Vec<f64> {
        (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.05 - 2.5).collect()
    }

    /// Width and height from the PNG IHDR chunk
    fn png_size(path: &Path) -> (u32, u32) {
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&bytes[12..16], b"IHDR");
        let be = |at: usize| u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap());
        (be(16), be(20))
    }

    #[test]
    fn overall_report_is_3000_by_1800_in_new_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sub").join("Overall_Diff_Distribution.png");
        let values = samples();
        let stats = SummaryStatistics::compute(&values).unwrap();

        PlottersRenderer::new()
            .render(&values, &stats, &PlotSpec::overall(50, 300), &output)
            .unwrap();

        assert_eq!(png_size(&output), (3000, 1800));
    }

    #[test]
    fn pair_report_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("diff_distribution_tile.png");
        fs::write(&output, b"stale").unwrap();
        let pair = MatchedPair {
            base_name: "tile".into(),
            primary: PathBuf::from("in1/tile.tif"),
            secondary: PathBuf::from("in2/tile.tiff"),
        };
        let values = samples();
        let stats = SummaryStatistics::compute(&values).unwrap();

        PlottersRenderer::new()
            .render(&values, &stats, &PlotSpec::per_pair(&pair, 50, 300), &output)
            .unwrap();

        assert_eq!(png_size(&output), (2400, 1500));
    }

    #[test]
    fn constant_samples_render_without_kde() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("flat.png");
        let values = vec![2.0; 4];
        let stats = SummaryStatistics::compute(&values).unwrap();

        PlottersRenderer::new()
            .render(&values, &stats, &PlotSpec::overall(50, 72), &output)
            .unwrap();

        assert_eq!(png_size(&output), (720, 432));
    }

    #[test]
    fn empty_samples_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let stats = SummaryStatistics {
            mean: 0.0,
            mode: 0.0,
            variance: 0.0,
            std_dev: 0.0,
        };
        let err = PlottersRenderer::new()
            .render(&[], &stats, &PlotSpec::overall(50, 72), &dir.path().join("x.png"))
            .unwrap_err();
        assert!(matches!(err, Error::EmptySampleSet));
    }
}
