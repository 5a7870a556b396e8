//! Per-run time series: one total time per line, baseline vs. optimized.

use std::path::Path;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::stats::{mean, moving_average};

/// Runs per measurement point written by the benchmark driver.
pub const DEFAULT_RUNS: u32 = 10;
/// Moving-average window (odd so the average stays centered).
pub const DEFAULT_WINDOW: usize = 11;

/// Load one float per line; blank lines are skipped.
pub fn load_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    parse_series(path, &text)
}

pub fn parse_series(path: &Path, text: &str) -> Result<Vec<f64>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let tok = line.trim();
            tok.parse::<f64>().map_err(|_| AnalysisError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                token: tok.to_string(),
            })
        })
        .collect()
}

/// A normalised series with its smoothed curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    /// Per-run values divided by the runs per point.
    pub values: Vec<f64>,
    /// Moving average; `smoothed[i]` sits at x = `offset + i`.
    pub smoothed: Vec<f64>,
    pub offset: usize,
    pub mean: f64,
}

impl SmoothedSeries {
    pub fn new(raw: &[f64], runs: u32, window: usize, track: &str) -> Result<Self> {
        let values: Vec<f64> = raw.iter().map(|v| v / f64::from(runs)).collect();
        let mean = mean(&values).ok_or_else(|| AnalysisError::EmptyPopulation {
            track: track.to_string(),
        })?;
        let smoothed = moving_average(&values, window)?;
        let offset = (values.len() - smoothed.len()) / 2;
        Ok(SmoothedSeries {
            values,
            smoothed,
            offset,
            mean,
        })
    }
}

/// Baseline and optimized series plus `mean(optimized) / mean(baseline)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesComparison {
    pub baseline: SmoothedSeries,
    pub optimized: SmoothedSeries,
    pub ratio: f64,
}

impl SeriesComparison {
    pub fn compute(baseline: &[f64], optimized: &[f64], runs: u32, window: usize) -> Result<Self> {
        let baseline = SmoothedSeries::new(baseline, runs, window, "baseline")?;
        let optimized = SmoothedSeries::new(optimized, runs, window, "optimized")?;
        let ratio = optimized.mean / baseline.mean;
        Ok(SeriesComparison {
            baseline,
            optimized,
            ratio,
        })
    }

    pub fn from_files(baseline: &Path, optimized: &Path, runs: u32, window: usize) -> Result<Self> {
        let b = load_series(baseline)?;
        let o = load_series(optimized)?;
        log::debug!(
            "series: {} baseline / {} optimized points",
            b.len(),
            o.len()
        );
        Self::compute(&b, &o, runs, window)
    }
}
