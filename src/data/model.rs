use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RunRecord – one timing trial of the experiment harness
// ---------------------------------------------------------------------------

/// A single labelled timing run: the sentinel line plus its two data lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    /// Sentinel text with surrounding whitespace stripped,
    /// e.g. `Naive(T+C) PCT timing run`.
    pub label: String,
    /// First data line (hammer counts per attempt).
    pub seq_a: Vec<i64>,
    /// Second data line: the per-attempt measurement (CPU cycles).
    pub seq_b: Vec<i64>,
}

impl RunRecord {
    pub fn new(label: impl Into<String>, seq_a: Vec<i64>, seq_b: Vec<i64>) -> Self {
        RunRecord {
            label: label.into(),
            seq_a,
            seq_b,
        }
    }

    /// The measurement array contributed to aggregate populations.
    pub fn measurements(&self) -> &[i64] {
        &self.seq_b
    }
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} / {} values)",
            self.label,
            self.seq_a.len(),
            self.seq_b.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Group / TrackPair – folded views of a filtered run stream
// ---------------------------------------------------------------------------

/// One period-sized slice of a filtered run stream.
/// The last group of a stream may be shorter than the period.
pub type Group = Vec<RunRecord>;

/// A filtered stream folded into groups, with the period it was folded by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub period: usize,
    pub groups: Vec<Group>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Concatenate the groups back into the flat stream they came from.
    pub fn unfold(&self) -> Vec<RunRecord> {
        self.groups.iter().flatten().cloned().collect()
    }
}

/// Two independently folded tracks built from the same record stream.
///
/// Group counts may differ; pairing groups by index is only meaningful when
/// [`TrackPair::is_aligned`] holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPair {
    pub a: Track,
    pub b: Track,
}

impl TrackPair {
    pub fn is_aligned(&self) -> bool {
        self.a.len() == self.b.len()
    }
}

// ---------------------------------------------------------------------------
// Populations – cross-file aggregate of one condition per track
// ---------------------------------------------------------------------------

/// Flat measurement populations for the baseline (`a`) and optimized (`b`)
/// tracks. Concatenation order follows file then group order but carries no
/// meaning; lengths need not match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Populations {
    pub a: Vec<i64>,
    pub b: Vec<i64>,
    /// Number of files that contributed at least one group.
    pub files: usize,
}

impl Populations {
    pub fn extend(&mut self, other: Populations) {
        self.a.extend(other.a);
        self.b.extend(other.b);
        self.files += other.files;
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }
}
