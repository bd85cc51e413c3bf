use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Descriptive statistics of one difference sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    /// Most frequent exact value; see [`exact_mode`]
    pub mode: f64,
    /// Population variance (divides by n)
    pub variance: f64,
    pub std_dev: f64,
}

impl SummaryStatistics {
    pub fn compute(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptySampleSet);
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Ok(Self {
            mean,
            mode: exact_mode(values).ok_or(Error::EmptySampleSet)?,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Four lines for the plot annotation box, three decimals each
    pub fn annotation(&self) -> String {
        format!(
            "Mean: {:.3}\nMode: {:.3}\nVariance: {:.3}\nSD: {:.3}",
            self.mean, self.mode, self.variance, self.std_dev
        )
    }
}

/// Most frequent exact value, no binning.
///
/// Values are visited in ascending order and the first to reach the highest count
/// wins, so ties resolve to the smallest value. On continuous data nearly every value
/// is unique and this degenerates to the minimum.
pub fn exact_mode(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mut iter = sorted.into_iter();
    let first = iter.next()?;
    let (mut best, mut best_count) = (first, 1usize);
    let (mut current, mut count) = (first, 1usize);
    for v in iter {
        if v == current {
            count += 1;
        } else {
            current = v;
            count = 1;
        }
        if count > best_count {
            best = current;
            best_count = count;
        }
    }
    Some(best)
}
