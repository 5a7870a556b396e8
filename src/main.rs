mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{terms_or, AggregateArgs, Cli, Commands, CompareArgs, SeriesArgs, SplitArgs};
use runfold::config::AnalysisConfig;
use runfold::data::aggregate::aggregate;
use runfold::data::filter::LabelPredicate;
use runfold::data::fold::{fold_filtered, split_tracks};
use runfold::data::loader::load_file;
use runfold::data::model::Track;
use runfold::error::AnalysisError;
use runfold::export::write_populations;
use runfold::series::SeriesComparison;
use runfold::stats::{median, Comparison, Summary};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AnalysisConfig::load_or_default(cli.config.as_deref())
        .context("loading analysis config")?;

    match &cli.command {
        Commands::Extract { file } => extract(file, cli.json),
        Commands::Split(args) => split(args, &config, cli.json),
        Commands::Compare(args) => compare(args, &config, cli.json),
        Commands::Aggregate(args) => run_aggregate(args, &config, cli.json),
        Commands::Series(args) => series(args, cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn extract(file: &Path, json: bool) -> Result<()> {
    let records = load_file(file)?;
    if json {
        return print_json(&records);
    }
    for (i, r) in records.iter().enumerate() {
        println!("{i:4}  {r}");
    }
    println!("{} timing runs", records.len());
    Ok(())
}

fn split(args: &SplitArgs, config: &AnalysisConfig, json: bool) -> Result<()> {
    let track_a = terms_or(&args.track_a, &config.track_a);
    let track_b = terms_or(&args.track_b, &config.track_b);
    let shared = LabelPredicate::all_of(args.shared.iter().cloned());

    let records = load_file(&args.file)?;
    let pair = split_tracks(&records, &track_a, &track_b, &shared);
    if !pair.is_aligned() {
        log::warn!(
            "tracks have {} and {} groups; index pairing is not meaningful",
            pair.a.len(),
            pair.b.len()
        );
    }

    let reports = [
        TrackReport::new(&config.labels[0], &track_a, &pair.a),
        TrackReport::new(&config.labels[1], &track_b, &pair.b),
    ];
    if json {
        return print_json(&reports);
    }
    for report in &reports {
        println!(
            "{} [{}]: period {}, {} groups",
            report.name,
            report.condition,
            report.period,
            report.groups.len()
        );
        for (i, group) in report.groups.iter().enumerate() {
            println!("  group {i}");
            for run in group {
                match run.median {
                    Some(m) => println!("    {:<40} median {m:.1}", run.label),
                    None => println!("    {:<40} (no samples)", run.label),
                }
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct RunReport {
    label: String,
    samples: usize,
    median: Option<f64>,
}

#[derive(Serialize)]
struct TrackReport {
    name: String,
    condition: String,
    period: usize,
    groups: Vec<Vec<RunReport>>,
}

impl TrackReport {
    fn new(name: &str, condition: &LabelPredicate, track: &Track) -> Self {
        let groups = track
            .groups
            .iter()
            .map(|g| {
                g.iter()
                    .map(|r| RunReport {
                        label: r.label.clone(),
                        samples: r.seq_b.len(),
                        median: median(&r.seq_b),
                    })
                    .collect()
            })
            .collect();
        TrackReport {
            name: name.to_string(),
            condition: condition.to_string(),
            period: track.period,
            groups,
        }
    }
}

fn compare(args: &CompareArgs, config: &AnalysisConfig, json: bool) -> Result<()> {
    let file = args.file.as_deref().unwrap_or(config.comparison_file.as_path());
    let cond = args.condition.resolve(&config.condition);
    let run = args.run.unwrap_or(config.comparison_run);
    let mut window = config.window;
    if let Some(start) = args.start {
        window.start = start;
    }
    if let Some(len) = args.len {
        window.len = len;
    }

    let records = load_file(file)?;
    let track = fold_filtered(&records, &cond);
    let group = track.groups.get(run).ok_or(AnalysisError::RunOutOfRange {
        run,
        available: track.len(),
    })?;
    let cmp = Comparison::from_group(file, group, window)?;

    if json {
        return print_json(&cmp);
    }
    println!("{} run {run} (period {})", file.display(), track.period);
    println!(
        "  {:<10} {:<32} n={:<6} median {:.1}",
        config.labels[0], cmp.baseline.label, cmp.baseline.count, cmp.baseline.median
    );
    println!(
        "  {:<10} {:<32} n={:<6} median {:.1}",
        config.labels[1], cmp.optimized.label, cmp.optimized.count, cmp.optimized.median
    );
    println!("ratio {:.4}", cmp.ratio);
    Ok(())
}

fn run_aggregate(args: &AggregateArgs, config: &AnalysisConfig, json: bool) -> Result<()> {
    let pattern = args.pattern.as_deref().unwrap_or(config.histogram_glob.as_str());
    let cond = args.condition.resolve(&config.condition);
    let sort = config.sort_files && !args.unsorted;
    log::debug!("aggregating '{pattern}' where {cond}");

    let pops = aggregate(pattern, &cond, args.policy(config), sort)?;
    // Empty populations fail here, before any export file is created.
    let summary = Summary::from_populations(&pops, &config.labels)?;
    if let Some(out) = &args.output {
        write_populations(out, &pops, &config.labels)
            .with_context(|| format!("exporting populations to {}", out.display()))?;
    }

    if json {
        return print_json(&summary);
    }
    println!("{} files", summary.files);
    for t in [&summary.baseline, &summary.optimized] {
        println!("  {:<10} n={:<8} median {:.1}", t.label, t.count, t.median);
    }
    println!("ratio {:.4}", summary.ratio);
    Ok(())
}

fn series(args: &SeriesArgs, json: bool) -> Result<()> {
    let cmp = SeriesComparison::from_files(&args.baseline, &args.optimized, args.runs, args.window)?;
    if json {
        return print_json(&cmp);
    }
    println!(
        "baseline  {} points, mean {:.4}",
        cmp.baseline.values.len(),
        cmp.baseline.mean
    );
    println!(
        "optimized {} points, mean {:.4}",
        cmp.optimized.values.len(),
        cmp.optimized.mean
    );
    println!("ratio {:.4}", cmp.ratio);
    Ok(())
}
