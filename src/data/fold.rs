use super::filter::{filter_records, LabelPredicate};
use super::model::{Group, RunRecord, Track, TrackPair};

// ---------------------------------------------------------------------------
// Period detection
// ---------------------------------------------------------------------------

/// Number of records in one repetition cycle of labels.
///
/// The period is the first index `i > 0` whose label equals the label at
/// index 0. When the first label never comes back the whole stream is a
/// single cycle and the period is its length; an empty stream has period 0.
pub fn detect_period(records: &[RunRecord]) -> usize {
    let Some(first) = records.first() else {
        return 0;
    };
    records
        .iter()
        .skip(1)
        .position(|r| r.label == first.label)
        .map_or(records.len(), |i| i + 1)
}

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Cut `records` into consecutive groups of `period` records. The last group
/// holds the remainder when the length is not a multiple of `period`.
/// A period of 0 yields no groups.
pub fn fold(records: &[RunRecord], period: usize) -> Vec<Group> {
    if period == 0 {
        return Vec::new();
    }
    records.chunks(period).map(<[RunRecord]>::to_vec).collect()
}

/// Fold an already filtered stream by its inferred period.
pub fn fold_stream(records: &[RunRecord]) -> Track {
    let period = detect_period(records);
    Track {
        period,
        groups: fold(records, period),
    }
}

/// Filter `records` by `pred`, then fold by the inferred period.
pub fn fold_filtered(records: &[RunRecord], pred: &LabelPredicate) -> Track {
    fold_stream(&filter_records(records, pred))
}

// ---------------------------------------------------------------------------
// Dual-track split
// ---------------------------------------------------------------------------

/// Build two independently folded tracks from one stream.
///
/// Track A keeps records matching `track_a AND shared`, track B those
/// matching `track_b AND shared`. Each track keeps its own source order.
pub fn split_tracks(
    records: &[RunRecord],
    track_a: &LabelPredicate,
    track_b: &LabelPredicate,
    shared: &LabelPredicate,
) -> TrackPair {
    let cond_a = track_a.clone().and(shared.clone());
    let cond_b = track_b.clone().and(shared.clone());
    TrackPair {
        a: fold_filtered(records, &cond_a),
        b: fold_filtered(records, &cond_b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{pc, pct, tlb_then_cache};

    fn run(label: &str, v: i64) -> RunRecord {
        RunRecord::new(label, vec![1], vec![v])
    }

    fn labels(groups: &[Group]) -> Vec<Vec<&str>> {
        groups
            .iter()
            .map(|g| g.iter().map(|r| r.label.as_str()).collect())
            .collect()
    }

    #[test]
    fn period_of_alternating_labels() {
        let stream: Vec<_> = ["A", "B", "A", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, l)| run(l, i as i64))
            .collect();
        assert_eq!(detect_period(&stream), 2);

        let groups = fold(&stream, 2);
        assert_eq!(labels(&groups), vec![vec!["A", "B"], vec!["A", "B"], vec!["A"]]);
    }

    #[test]
    fn period_without_repeat_is_stream_length() {
        let stream = vec![run("A", 0), run("B", 1), run("C", 2)];
        assert_eq!(detect_period(&stream), 3);
        assert_eq!(fold_stream(&stream).groups.len(), 1);
    }

    #[test]
    fn period_of_single_label_stream_is_one() {
        let stream = vec![run("A", 0), run("A", 1), run("A", 2)];
        let track = fold_stream(&stream);
        assert_eq!(track.period, 1);
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn empty_stream_has_no_groups() {
        assert_eq!(detect_period(&[]), 0);
        let track = fold_stream(&[]);
        assert_eq!(track.period, 0);
        assert!(track.is_empty());
    }

    #[test]
    fn zero_period_yields_nothing() {
        let stream = vec![run("A", 0)];
        assert!(fold(&stream, 0).is_empty());
    }

    #[test]
    fn unfold_restores_stream() {
        let stream: Vec<_> = (0..7).map(|i| run(["X", "Y", "Z"][i % 3], i as i64)).collect();
        let track = fold_stream(&stream);
        assert_eq!(track.period, 3);
        assert_eq!(track.unfold(), stream);
    }

    #[test]
    fn split_builds_independent_tracks() {
        let stream = vec![
            run("Naive(T+C) PC timing run", 1),
            run("Naive(T+C) PCT timing run", 2),
            run("Ninja(T+C) PC timing run", 3),
            run("Ninja(T+C) PCT timing run", 4),
            run("Naive(C+T) PCT timing run", 5),
            run("Naive(T+C) PC timing run", 6),
            run("Naive(T+C) PCT timing run", 7),
            run("Ninja(T+C) PC timing run", 8),
            run("Ninja(T+C) PCT timing run", 9),
        ];
        let pair = split_tracks(&stream, &pc(), &pct(), &tlb_then_cache());

        assert_eq!(pair.a.period, 2);
        let a: Vec<Vec<i64>> = pair
            .a
            .groups
            .iter()
            .map(|g| g.iter().map(|r| r.seq_b[0]).collect())
            .collect();
        assert_eq!(a, vec![vec![1, 3], vec![6, 8]]);

        let b: Vec<Vec<i64>> = pair
            .b
            .groups
            .iter()
            .map(|g| g.iter().map(|r| r.seq_b[0]).collect())
            .collect();
        assert_eq!(b, vec![vec![2, 4], vec![7, 9]]);
        assert!(pair.is_aligned());
    }

    #[test]
    fn split_with_no_matches_is_empty() {
        let stream = vec![run("Normal timing run", 1)];
        let pair = split_tracks(&stream, &pc(), &pct(), &LabelPredicate::Any);
        assert!(pair.a.is_empty());
        assert!(pair.b.is_empty());
    }
}
