//! Command-line arguments for `runfold`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use runfold::config::AnalysisConfig;
use runfold::data::aggregate::FailurePolicy;
use runfold::data::filter::LabelPredicate;
use runfold::series::{DEFAULT_RUNS, DEFAULT_WINDOW};

#[derive(Parser, Debug)]
#[command(name = "runfold")]
#[command(version)]
#[command(about = "Fold timing-run logs into baseline vs. optimized populations", long_about = None)]
pub struct Cli {
    /// JSON analysis config (defaults apply to every field it omits)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the timing runs found in one log file
    Extract {
        file: PathBuf,
    },

    /// Fold one log file into two label tracks
    Split(SplitArgs),

    /// Compare the baseline and optimized run of one group in one file
    Compare(CompareArgs),

    /// Aggregate every file matching a pattern into two populations
    Aggregate(AggregateArgs),

    /// Compare two per-run time series (one value per line)
    Series(SeriesArgs),
}

/// Label substrings; each flag may be repeated and all terms must match.
#[derive(Args, Debug, Default)]
pub struct ConditionArgs {
    /// Only use runs whose label contains TEXT
    #[arg(long = "require", value_name = "TEXT")]
    pub require: Vec<String>,
}

impl ConditionArgs {
    pub fn resolve(&self, fallback: &LabelPredicate) -> LabelPredicate {
        terms_or(&self.require, fallback)
    }
}

/// Conjunction of `terms`, or `fallback` when no term was given.
pub fn terms_or(terms: &[String], fallback: &LabelPredicate) -> LabelPredicate {
    if terms.is_empty() {
        fallback.clone()
    } else {
        LabelPredicate::all_of(terms.iter().cloned())
    }
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    pub file: PathBuf,

    /// Label text selecting track A (default: "PC ")
    #[arg(long = "track-a", value_name = "TEXT")]
    pub track_a: Vec<String>,

    /// Label text selecting track B (default: "PCT")
    #[arg(long = "track-b", value_name = "TEXT")]
    pub track_b: Vec<String>,

    /// Label text both tracks must also contain
    #[arg(long, value_name = "TEXT")]
    pub shared: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Log file (default: `comparison_file` from the config)
    pub file: Option<PathBuf>,

    /// Group index to compare
    #[arg(long)]
    pub run: Option<usize>,

    /// First measurement of the window
    #[arg(long)]
    pub start: Option<usize>,

    /// Number of measurements in the window
    #[arg(long = "len")]
    pub len: Option<usize>,

    #[command(flatten)]
    pub condition: ConditionArgs,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Glob selecting the log files (default: `histogram_glob` from the config)
    pub pattern: Option<String>,

    #[command(flatten)]
    pub condition: ConditionArgs,

    /// Leave out files that fail to parse instead of aborting
    #[arg(long)]
    pub skip_bad_files: bool,

    /// Keep the file system's order of matches
    #[arg(long)]
    pub unsorted: bool,

    /// Also write the populations (.json, .csv or .parquet)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl AggregateArgs {
    pub fn policy(&self, config: &AnalysisConfig) -> FailurePolicy {
        if self.skip_bad_files {
            FailurePolicy::Skip
        } else {
            config.on_error
        }
    }
}

#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Baseline series
    pub baseline: PathBuf,

    /// Optimized series
    pub optimized: PathBuf,

    /// Runs per measurement point
    #[arg(long, default_value_t = DEFAULT_RUNS, value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Moving-average window (odd)
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_require_builds_conjunction() {
        let cli = Cli::parse_from([
            "runfold",
            "aggregate",
            "out/*.tct",
            "--require",
            "PCT",
            "--require",
            "(C+T)",
        ]);
        let Commands::Aggregate(args) = cli.command else {
            panic!("expected aggregate");
        };
        let cond = args.condition.resolve(&LabelPredicate::Any);
        assert!(cond.matches("Ninja(C+T) PCT timing run"));
        assert!(!cond.matches("Ninja(T+C) PCT timing run"));
        assert_eq!(args.pattern.as_deref(), Some("out/*.tct"));
    }

    #[test]
    fn no_require_falls_back_to_config() {
        let args = ConditionArgs::default();
        let fallback = LabelPredicate::contains("PCT");
        assert_eq!(args.resolve(&fallback), fallback);
    }
}
