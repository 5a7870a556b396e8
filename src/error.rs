use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AnalysisError – everything the core can fail with
// ---------------------------------------------------------------------------

/// Errors raised while extracting, folding, aggregating or summarising runs.
///
/// Every variant is fatal to the file or computation in progress. Whether a
/// failing file aborts a multi-file aggregation is decided by the caller
/// (see [`crate::data::aggregate::FailurePolicy`]).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sentinel line is not followed by two data lines.
    #[error("{}:{line}: timing run is missing its data lines", path.display())]
    MalformedLog { path: PathBuf, line: usize },

    /// A data line holds something that is not a decimal integer.
    #[error("{}:{line}: '{token}' is not an integer", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// The pairwise aggregation path found groups that are not pairs.
    #[error("{}: expected runs to repeat with period 2, found period {period}", path.display())]
    InvalidPeriod { path: PathBuf, period: usize },

    #[error("population '{track}' is empty; median is undefined")]
    EmptyPopulation { track: String },

    #[error("invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Moving-average window is zero, even, or longer than the series.
    #[error("invalid smoothing window {window} for a series of {len} points")]
    InvalidWindow { window: usize, len: usize },

    #[error("comparison run {run} out of range ({available} groups available)")]
    RunOutOfRange { run: usize, available: usize },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}
