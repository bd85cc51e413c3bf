//! Density histogram binning and Gaussian kernel density estimation.
//!
//! Pure numeric helpers; drawing lives in [`super::render`].

/// Above this many samples the KDE is evaluated on linearly binned weights
/// instead of every sample.
const EXACT_KDE_LIMIT: usize = 10_000;
const KDE_BINNING_GRID: usize = 2048;

/// Equal-width histogram normalised so that the bar areas sum to one
#[derive(Debug, Clone, PartialEq)]
pub struct DensityHistogram {
    pub lo: f64,
    pub hi: f64,
    pub bin_width: f64,
    pub densities: Vec<f64>,
}

impl DensityHistogram {
    /// Bins span `[min, max]` with the last bin closed. A zero-width range is
    /// widened to `[min - 0.5, max + 0.5]`. Returns `None` for no samples or bins.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let (min, max) = min_max(values);
        let (lo, hi) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let bin_width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let norm = values.len() as f64 * bin_width;
        Some(Self {
            lo,
            hi,
            bin_width,
            densities: counts.into_iter().map(|c| c as f64 / norm).collect(),
        })
    }

    /// `(left edge, right edge, density)` per bin
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.densities.iter().enumerate().map(|(i, &d)| {
            let x0 = self.lo + i as f64 * self.bin_width;
            (x0, x0 + self.bin_width, d)
        })
    }

    pub fn max_density(&self) -> f64 {
        self.densities.iter().copied().fold(0.0, f64::max)
    }
}

/// Gaussian KDE with Scott's bandwidth, evaluated at `grid_points` evenly spaced
/// positions over `[min, max]`.
///
/// Returns `None` when there are fewer than two samples or no spread, since the
/// bandwidth collapses to zero.
pub fn gaussian_kde(values: &[f64], grid_points: usize) -> Option<Vec<(f64, f64)>> {
    if values.len() < 2 || grid_points < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sample_var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let bandwidth = sample_var.sqrt() * n.powf(-0.2);
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return None;
    }

    let (min, max) = min_max(values);
    let support = if values.len() > EXACT_KDE_LIMIT {
        linear_binning(values, min, max, KDE_BINNING_GRID)
    } else {
        values.iter().map(|&v| (v, 1.0)).collect()
    };

    let step = (max - min) / (grid_points - 1) as f64;
    Some(
        (0..grid_points)
            .map(|i| {
                let x = min + i as f64 * step;
                (x, evaluate_kde(&support, n, bandwidth, x))
            })
            .collect(),
    )
}

fn evaluate_kde(support: &[(f64, f64)], n: f64, bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    support
        .iter()
        .map(|&(c, w)| {
            let z = (x - c) / bandwidth;
            w * (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

// Spread each sample's unit weight over its two neighbouring grid nodes.
fn linear_binning(values: &[f64], min: f64, max: f64, nodes: usize) -> Vec<(f64, f64)> {
    let step = (max - min) / (nodes - 1) as f64;
    let mut weights = vec![0.0; nodes];
    for &v in values {
        let pos = (v - min) / step;
        let i = (pos.floor() as usize).min(nodes - 2);
        let frac = pos - i as f64;
        weights[i] += 1.0 - frac;
        weights[i + 1] += frac;
    }
    weights
        .into_iter()
        .enumerate()
        .filter(|&(_, w)| w > 0.0)
        .map(|(i, w)| (min + i as f64 * step, w))
        .collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
