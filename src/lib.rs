//! Extraction, period folding and cross-file aggregation of timing-run logs.
//!
//! A log holds labelled timing runs of a baseline and an optimized variant
//! run back to back. This crate turns a set of such logs into two
//! comparable measurement populations and their median ratio.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod series;
pub mod stats;

pub use error::{AnalysisError, Result};
