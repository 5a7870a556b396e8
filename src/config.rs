use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::aggregate::FailurePolicy;
use crate::data::filter::{pc, pct, tlb_then_cache, LabelPredicate};
use crate::error::{AnalysisError, Result};
use crate::stats::Window;

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Knobs of an analysis run. Every field has a default, so a config file
/// only needs to name what it changes:
///
/// ```json
/// { "histogram_glob": "out/r*.tct", "comparison_run": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Log files aggregated into the two populations.
    pub histogram_glob: String,
    /// Log file used for the single-run comparison.
    pub comparison_file: PathBuf,
    /// Group index of the single-run comparison.
    pub comparison_run: usize,
    /// Display names of the baseline and optimized tracks.
    pub labels: [String; 2],
    /// Runs taking part in aggregation and comparison.
    pub condition: LabelPredicate,
    pub track_a: LabelPredicate,
    pub track_b: LabelPredicate,
    pub window: Window,
    pub sort_files: bool,
    pub on_error: FailurePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            histogram_glob: "results/r*.tct".to_string(),
            comparison_file: PathBuf::from("results/r4.3.tct"),
            comparison_run: 0,
            labels: ["Original".to_string(), "Optimized".to_string()],
            condition: pct().and(tlb_then_cache()),
            track_a: pc(),
            track_b: pct(),
            window: Window::default(),
            sort_files: true,
            on_error: FailurePolicy::Abort,
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| AnalysisError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// `load(path)` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                log::debug!("loading config from {}", p.display());
                Self::load(p)
            }
            None => Ok(Self::default()),
        }
    }
}
