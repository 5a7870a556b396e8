//! Data layer: extraction, filtering, folding and aggregation of timing runs.
//!
//! Architecture:
//! ```text
//!  results/r*.tct
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  sentinel + 2 data lines → Vec<RunRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  LabelPredicate → filtered stream (file order kept)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   fold    │  infer period → groups, or two tracks (TrackPair)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  pairwise split per file, fan-in → Populations
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod fold;
pub mod loader;
pub mod model;
