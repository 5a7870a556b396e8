//! Point statistics over measurement populations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::{Group, Populations};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Medians and the baseline/optimized ratio
// ---------------------------------------------------------------------------

/// Median of `values`; the mean of the two middle values for even lengths.
/// `None` for an empty slice.
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

fn require_median(values: &[i64], track: &str) -> Result<f64> {
    median(values).ok_or_else(|| AnalysisError::EmptyPopulation {
        track: track.to_string(),
    })
}

/// `median(optimized) / median(baseline)`.
///
/// A zero baseline median gives an infinite (or NaN) ratio, which
/// `serde_json` writes as `null`; a warning is logged for it.
pub fn median_ratio(baseline: &[i64], optimized: &[i64]) -> Result<f64> {
    let a = require_median(baseline, "baseline")?;
    let b = require_median(optimized, "optimized")?;
    Ok(ratio_of(a, b))
}

/// `optimized / baseline`, warning when the baseline is zero.
fn ratio_of(baseline: f64, optimized: f64) -> f64 {
    if baseline == 0.0 {
        log::warn!("baseline median is 0; ratio is not finite");
    }
    optimized / baseline
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Centered moving average over odd `window` ("valid" mode: only positions
/// with a full window, so the output has `len - window + 1` points).
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 || window % 2 == 0 || window > values.len() {
        return Err(AnalysisError::InvalidWindow {
            window,
            len: values.len(),
        });
    }
    Ok(values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect())
}

// ---------------------------------------------------------------------------
// Window – slice of a measurement array considered in a single comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    pub start: usize,
    pub len: usize,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            start: 0,
            len: 8192,
        }
    }
}

impl Window {
    /// `values[start..start + len]`, clamped to the slice bounds.
    pub fn apply<'a>(&self, values: &'a [i64]) -> &'a [i64] {
        let start = self.start.min(values.len());
        let end = start.saturating_add(self.len).min(values.len());
        &values[start..end]
    }
}

// ---------------------------------------------------------------------------
// Summaries handed to the presentation layer
// ---------------------------------------------------------------------------

/// Size and median of one population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub label: String,
    pub count: usize,
    pub median: f64,
}

/// Both tracks of a cross-file aggregation plus the median ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub baseline: TrackSummary,
    pub optimized: TrackSummary,
    pub ratio: f64,
}

impl Summary {
    pub fn from_populations(pops: &Populations, labels: &[String; 2]) -> Result<Self> {
        let baseline = TrackSummary {
            label: labels[0].clone(),
            count: pops.a.len(),
            median: require_median(&pops.a, &labels[0])?,
        };
        let optimized = TrackSummary {
            label: labels[1].clone(),
            count: pops.b.len(),
            median: require_median(&pops.b, &labels[1])?,
        };
        let ratio = ratio_of(baseline.median, optimized.median);
        Ok(Summary {
            files: pops.files,
            baseline,
            optimized,
            ratio,
        })
    }
}

/// Single-run comparison of the first two records of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: TrackSummary,
    pub optimized: TrackSummary,
    pub ratio: f64,
}

impl Comparison {
    /// Compare `group[1]` against `group[0]`.
    ///
    /// Counts and medians describe the windowed measurements; the ratio is
    /// taken over the full arrays. `path` is only used for error reporting.
    pub fn from_group(path: &Path, group: &Group, window: Window) -> Result<Self> {
        let [first, second, ..] = group.as_slice() else {
            return Err(AnalysisError::InvalidPeriod {
                path: path.to_path_buf(),
                period: group.len(),
            });
        };
        let a = window.apply(first.measurements());
        let b = window.apply(second.measurements());
        let baseline = TrackSummary {
            label: first.label.clone(),
            count: a.len(),
            median: require_median(a, &first.label)?,
        };
        let optimized = TrackSummary {
            label: second.label.clone(),
            count: b.len(),
            median: require_median(b, &second.label)?,
        };
        let ratio = median_ratio(first.measurements(), second.measurements())?;
        Ok(Comparison {
            baseline,
            optimized,
            ratio,
        })
    }
}
