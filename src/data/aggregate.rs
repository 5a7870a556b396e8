use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

use super::filter::LabelPredicate;
use super::fold::fold_filtered;
use super::loader::load_file;
use super::model::{Populations, RunRecord};

/// Records per group expected by the pairwise (baseline, optimized) split.
pub const PAIR_PERIOD: usize = 2;

/// What to do when one file of a multi-file aggregation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing file and return its error.
    #[default]
    Abort,
    /// Log the failure and leave the file out of the populations.
    Skip,
}

// ---------------------------------------------------------------------------
// File selection
// ---------------------------------------------------------------------------

/// Expand a glob pattern into the log files it selects.
///
/// With `sort` the paths are ordered lexicographically, so repeated runs
/// concatenate populations in the same order. Entries the expansion cannot
/// read are handled by `policy` like any other failing file.
pub fn expand_pattern(pattern: &str, sort: bool, policy: FailurePolicy) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| AnalysisError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let entries = entries.map(|entry| {
        entry.map_err(|e| {
            let path = e.path().to_path_buf();
            AnalysisError::io(path, e.into_error())
        })
    });
    let mut paths = collect_files(entries, policy)?;
    if sort {
        paths.sort();
    }
    Ok(paths)
}

/// Keep the regular files among `entries`, applying `policy` to failed ones.
fn collect_files<I>(entries: I, policy: FailurePolicy) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Result<PathBuf>>,
{
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) if policy == FailurePolicy::Skip => {
                log::warn!("skipping unreadable entry: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Per-file contribution
// ---------------------------------------------------------------------------

/// Pairwise contribution of one record stream: for each full group, the
/// first record's measurements go to population A and the second's to B.
///
/// A filtered stream with no records contributes nothing. A period other
/// than [`PAIR_PERIOD`] is rejected instead of misindexing groups; a short
/// trailing group left by an odd-length stream is dropped.
pub fn pair_contributions(
    path: &Path,
    records: &[RunRecord],
    cond: &LabelPredicate,
) -> Result<Populations> {
    let track = fold_filtered(records, cond);
    if track.is_empty() {
        log::debug!("{}: no runs match {cond}", path.display());
        return Ok(Populations::default());
    }
    if track.period != PAIR_PERIOD {
        return Err(AnalysisError::InvalidPeriod {
            path: path.to_path_buf(),
            period: track.period,
        });
    }

    let mut out = Populations::default();
    for group in &track.groups {
        match group.as_slice() {
            [baseline, optimized] => {
                out.a.extend_from_slice(baseline.measurements());
                out.b.extend_from_slice(optimized.measurements());
            }
            partial => log::warn!(
                "{}: dropping incomplete trailing group ({} of {PAIR_PERIOD} runs)",
                path.display(),
                partial.len()
            ),
        }
    }
    out.files = 1;
    Ok(out)
}

/// Extract, filter and fold one file, returning its pairwise contribution.
pub fn file_contributions(path: &Path, cond: &LabelPredicate) -> Result<Populations> {
    let records = load_file(path)?;
    pair_contributions(path, &records, cond)
}

// ---------------------------------------------------------------------------
// Cross-file fan-in
// ---------------------------------------------------------------------------

/// Concatenate the pairwise contributions of every file in `paths`.
pub fn aggregate_files<P: AsRef<Path>>(
    paths: &[P],
    cond: &LabelPredicate,
    policy: FailurePolicy,
) -> Result<Populations> {
    let mut total = Populations::default();

    for path in paths {
        let path = path.as_ref();
        match file_contributions(path, cond) {
            Ok(part) => {
                log::info!(
                    "{}: {} baseline / {} optimized samples",
                    path.display(),
                    part.a.len(),
                    part.b.len()
                );
                total.extend(part);
            }
            Err(e) if policy == FailurePolicy::Skip => {
                log::warn!("skipping {}: {e}", path.display());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(total)
}

/// Aggregate every file selected by `pattern`.
pub fn aggregate(
    pattern: &str,
    cond: &LabelPredicate,
    policy: FailurePolicy,
    sort: bool,
) -> Result<Populations> {
    let paths = expand_pattern(pattern, sort, policy)?;
    if paths.is_empty() {
        log::warn!("pattern '{pattern}' selected no files");
    }
    aggregate_files(&paths, cond, policy)
}
