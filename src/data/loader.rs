use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::model::RunRecord;

/// Trailing marker identifying a sentinel line.
pub const SENTINEL_SUFFIX: &str = "timing run";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every timing run recorded in a log file, in file order.
///
/// The file handle is released before parsing starts.
pub fn load_file(path: &Path) -> Result<Vec<RunRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let records = parse_log(path, &text)?;
    log::debug!("{}: {} timing runs", path.display(), records.len());
    Ok(records)
}

/// Extract the runs contained in `text`. `path` is only used for error
/// reporting.
///
/// Expected layout, repeated anywhere in otherwise free-form output:
///
/// ```text
/// Naive(T+C) PCT timing run      <- sentinel: ends with "timing run"
///     1     1     2     1        <- seq_a
///  3012  2987  3120  2999        <- seq_b
/// ```
pub fn parse_log(path: &Path, text: &str) -> Result<Vec<RunRecord>> {
    let lines: Vec<&str> = text.lines().collect();
    extract_records(path, &lines)
}

/// Scan `lines` with a two-line lookahead and build one record per sentinel.
pub fn extract_records(path: &Path, lines: &[&str]) -> Result<Vec<RunRecord>> {
    let mut records = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if !is_sentinel(line) {
            continue;
        }
        let (Some(first), Some(second)) = (lines.get(i + 1), lines.get(i + 2)) else {
            return Err(AnalysisError::MalformedLog {
                path: path.to_path_buf(),
                line: i + 1,
            });
        };

        let seq_a = parse_integers(first, path, i + 2)?;
        let seq_b = parse_integers(second, path, i + 3)?;
        records.push(RunRecord::new(line.trim(), seq_a, seq_b));
    }

    Ok(records)
}

/// A sentinel is any line whose text (sans line terminator) ends with
/// [`SENTINEL_SUFFIX`]. Trailing whitespace disqualifies the line.
pub fn is_sentinel(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).ends_with(SENTINEL_SUFFIX)
}

// -- helpers --

/// Parse a whitespace-separated line of decimal integers.
/// `line_no` is 1-based and only used for error reporting.
fn parse_integers(line: &str, path: &Path, line_no: usize) -> Result<Vec<i64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<i64>().map_err(|_| AnalysisError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                token: tok.to_string(),
            })
        })
        .collect()
}
