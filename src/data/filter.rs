use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::RunRecord;

// ---------------------------------------------------------------------------
// Label predicates: which timing runs take part in an analysis
// ---------------------------------------------------------------------------

/// A composable condition on a run's label.
///
/// Serialises as externally tagged JSON so conditions can live in the
/// analysis config:
///
/// ```json
/// { "all": [ { "contains": "PCT" }, { "contains": "(T+C)" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPredicate {
    /// Matches every label.
    #[default]
    Any,
    Contains(String),
    Equals(String),
    Not(Box<LabelPredicate>),
    /// Logical AND; an empty list matches everything.
    All(Vec<LabelPredicate>),
    /// Logical OR; an empty list matches nothing.
    AnyOf(Vec<LabelPredicate>),
}

impl LabelPredicate {
    pub fn contains(needle: impl Into<String>) -> Self {
        LabelPredicate::Contains(needle.into())
    }

    pub fn equals(label: impl Into<String>) -> Self {
        LabelPredicate::Equals(label.into())
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelPredicate::Any => true,
            LabelPredicate::Contains(needle) => label.contains(needle.as_str()),
            LabelPredicate::Equals(expected) => label == expected,
            LabelPredicate::Not(inner) => !inner.matches(label),
            LabelPredicate::All(preds) => preds.iter().all(|p| p.matches(label)),
            LabelPredicate::AnyOf(preds) => preds.iter().any(|p| p.matches(label)),
        }
    }

    /// `self AND other`, flattening nested conjunctions.
    pub fn and(self, other: LabelPredicate) -> Self {
        match (self, other) {
            (LabelPredicate::Any, p) | (p, LabelPredicate::Any) => p,
            (LabelPredicate::All(mut lhs), LabelPredicate::All(rhs)) => {
                lhs.extend(rhs);
                LabelPredicate::All(lhs)
            }
            (LabelPredicate::All(mut lhs), p) => {
                lhs.push(p);
                LabelPredicate::All(lhs)
            }
            (p, LabelPredicate::All(mut rhs)) => {
                rhs.insert(0, p);
                LabelPredicate::All(rhs)
            }
            (lhs, rhs) => LabelPredicate::All(vec![lhs, rhs]),
        }
    }

    /// `self OR other`.
    pub fn or(self, other: LabelPredicate) -> Self {
        match (self, other) {
            (LabelPredicate::AnyOf(mut lhs), p) => {
                lhs.push(p);
                LabelPredicate::AnyOf(lhs)
            }
            (lhs, rhs) => LabelPredicate::AnyOf(vec![lhs, rhs]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        LabelPredicate::Not(Box::new(self))
    }

    /// Conjunction of `contains` terms; no terms means [`LabelPredicate::Any`].
    pub fn all_of<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        needles
            .into_iter()
            .map(LabelPredicate::contains)
            .fold(LabelPredicate::Any, LabelPredicate::and)
    }
}

impl fmt::Display for LabelPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, preds: &[LabelPredicate], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, p) in preds.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{p}")?;
            }
            write!(f, ")")
        }
        match self {
            LabelPredicate::Any => write!(f, "*"),
            LabelPredicate::Contains(s) => write!(f, "{s:?}"),
            LabelPredicate::Equals(s) => write!(f, "={s:?}"),
            LabelPredicate::Not(inner) => write!(f, "!{inner}"),
            LabelPredicate::All(preds) => join(f, preds, "&"),
            LabelPredicate::AnyOf(preds) => join(f, preds, "|"),
        }
    }
}

// ---------------------------------------------------------------------------
// Label markers emitted by the hammering harness
// ---------------------------------------------------------------------------

/// Runs tagged `PC` (`Naive(T+C) PC timing run`). The trailing space keeps
/// `PCT` runs out.
pub fn pc() -> LabelPredicate {
    LabelPredicate::contains("PC ")
}

/// Runs tagged `PCT` (`Ninja(T+C) PCT timing run`).
pub fn pct() -> LabelPredicate {
    LabelPredicate::contains("PCT")
}

/// TLB eviction followed by cache eviction.
pub fn tlb_then_cache() -> LabelPredicate {
    LabelPredicate::contains("(T+C)")
}

/// Cache eviction followed by TLB eviction.
pub fn cache_then_tlb() -> LabelPredicate {
    LabelPredicate::contains("(C+T)")
}

/// Records whose label satisfies `pred`, in their original order.
pub fn filter_records(records: &[RunRecord], pred: &LabelPredicate) -> Vec<RunRecord> {
    records
        .iter()
        .filter(|r| pred.matches(&r.label))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAIVE_PC: &str = "Naive(T+C) PC timing run";
    const NAIVE_PCT: &str = "Naive(T+C) PCT timing run";
    const NINJA_CT_PCT: &str = "Ninja(C+T) PCT timing run";

    #[test]
    fn markers_distinguish_pc_from_pct() {
        assert!(pc().matches(NAIVE_PC));
        assert!(!pc().matches(NAIVE_PCT));
        assert!(pct().matches(NAIVE_PCT));
        assert!(!pct().matches(NAIVE_PC));
    }

    #[test]
    fn conjunction_and_disjunction() {
        let cond = pct().and(tlb_then_cache());
        assert!(cond.matches(NAIVE_PCT));
        assert!(!cond.matches(NINJA_CT_PCT));
        assert!(!cond.matches(NAIVE_PC));

        let either = tlb_then_cache().or(cache_then_tlb());
        assert!(either.matches(NAIVE_PC));
        assert!(either.matches(NINJA_CT_PCT));
        assert!(!either.matches("Normal timing run"));
    }

    #[test]
    fn and_flattens_and_absorbs_any() {
        let p = LabelPredicate::Any.and(pc());
        assert_eq!(p, pc());

        let p = pc().and(tlb_then_cache()).and(cache_then_tlb());
        assert_eq!(
            p,
            LabelPredicate::All(vec![pc(), tlb_then_cache(), cache_then_tlb()])
        );
    }

    #[test]
    fn empty_combinators() {
        assert!(LabelPredicate::All(vec![]).matches("anything"));
        assert!(!LabelPredicate::AnyOf(vec![]).matches("anything"));
        assert_eq!(LabelPredicate::all_of(Vec::<String>::new()), LabelPredicate::Any);
    }

    #[test]
    fn negation_and_equality() {
        let not_naive = LabelPredicate::contains("Naive").not();
        assert!(not_naive.matches(NINJA_CT_PCT));
        assert!(!not_naive.matches(NAIVE_PC));
        assert!(LabelPredicate::equals(NAIVE_PC).matches(NAIVE_PC));
        assert!(!LabelPredicate::equals("Naive").matches(NAIVE_PC));
    }

    #[test]
    fn json_representation() {
        let p: LabelPredicate =
            serde_json::from_str(r#"{"all":[{"contains":"PCT"},{"not":{"contains":"Ninja"}}]}"#)
                .unwrap();
        assert!(p.matches(NAIVE_PCT));
        assert!(!p.matches(NINJA_CT_PCT));

        let any: LabelPredicate = serde_json::from_str(r#""any""#).unwrap();
        assert_eq!(any, LabelPredicate::Any);
    }

    #[test]
    fn filter_keeps_order() {
        let records = vec![
            RunRecord::new(NAIVE_PC, vec![], vec![1]),
            RunRecord::new(NAIVE_PCT, vec![], vec![2]),
            RunRecord::new(NINJA_CT_PCT, vec![], vec![3]),
        ];
        let kept = filter_records(&records, &pct());
        let seqs: Vec<i64> = kept.iter().map(|r| r.seq_b[0]).collect();
        assert_eq!(seqs, vec![2, 3]);
    }
}
