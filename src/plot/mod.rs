//! Rendering of difference distributions: density histogram, KDE overlay and a
//! statistics annotation box, written as PNG.
pub mod histogram;
pub mod render;

pub use histogram::{DensityHistogram, gaussian_kde};
pub use render::PlottersRenderer;

use std::path::Path;

use crate::core::pairing::MatchedPair;
use crate::core::stats::SummaryStatistics;
use crate::error::Result;

pub const OVERALL_TITLE: &str = "Overall Distribution of Pixel Differences Across All Files";

/// Layout and styling of one report image
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub title: String,
    pub bar_rgb: (u8, u8, u8),
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    /// Annotation font size in points
    pub font_pt: f64,
    /// Opacity of the annotation box background
    pub box_opacity: f64,
    pub bins: usize,
}

impl PlotSpec {
    /// Purple 8x5 in figure titled after the primary file
    pub fn per_pair(pair: &MatchedPair, bins: usize, dpi: u32) -> Self {
        Self {
            title: format!(
                "Distribution of Pixel Differences of {}",
                pair.primary_file_name()
            ),
            bar_rgb: (128, 0, 128),
            width_in: 8.0,
            height_in: 5.0,
            dpi,
            font_pt: 9.0,
            box_opacity: 0.7,
            bins,
        }
    }

    /// Dark green 10x6 in figure for the aggregate
    pub fn overall(bins: usize, dpi: u32) -> Self {
        Self {
            title: OVERALL_TITLE.to_string(),
            bar_rgb: (0, 100, 0),
            width_in: 10.0,
            height_in: 6.0,
            dpi,
            font_pt: 10.0,
            box_opacity: 0.8,
            bins,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Points to pixels at this spec's resolution
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

/// The plotting collaborator: draws one distribution report to `output`,
/// creating or overwriting the file.
pub trait HistogramRenderer {
    fn render(
        &self,
        values: &[f64],
        stats: &SummaryStatistics,
        spec: &PlotSpec,
        output: &Path,
    ) -> Result<()>;
}
