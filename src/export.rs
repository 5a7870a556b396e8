use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::Populations;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write both aggregate populations for the plotting side.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.json`    – `{ "labels": [..], "baseline": [..], "optimized": [..], "files": n }`
/// * `.csv`     – long format, one `track,cycles` row per sample
/// * `.parquet` – same long format, columns `track: Utf8`, `cycles: Int64`
pub fn write_populations(path: &Path, pops: &Populations, labels: &[String; 2]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => write_json(path, pops, labels),
        "csv" => write_csv(path, pops, labels),
        "parquet" | "pq" => write_parquet(path, pops, labels),
        other => bail!("Unsupported output extension: .{other}"),
    }?;
    log::info!(
        "wrote {} + {} samples to {}",
        pops.a.len(),
        pops.b.len(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PopulationsJson<'a> {
    labels: &'a [String; 2],
    baseline: &'a [i64],
    optimized: &'a [i64],
    files: usize,
}

fn write_json(path: &Path, pops: &Populations, labels: &[String; 2]) -> Result<()> {
    let doc = PopulationsJson {
        labels,
        baseline: &pops.a,
        optimized: &pops.b,
        files: pops.files,
    };
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &doc).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Row<'a> {
    track: &'a str,
    cycles: i64,
}

/// Samples in long format: all of track A, then all of track B.
fn rows<'a>(pops: &'a Populations, labels: &'a [String; 2]) -> impl Iterator<Item = Row<'a>> {
    let a = pops.a.iter().map(move |&cycles| Row {
        track: &labels[0],
        cycles,
    });
    let b = pops.b.iter().map(move |&cycles| Row {
        track: &labels[1],
        cycles,
    });
    a.chain(b)
}

fn write_csv(path: &Path, pops: &Populations, labels: &[String; 2]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for (i, row) in rows(pops, labels).enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn write_parquet(path: &Path, pops: &Populations, labels: &[String; 2]) -> Result<()> {
    let (tracks, cycles): (Vec<&str>, Vec<i64>) =
        rows(pops, labels).map(|r| (r.track, r.cycles)).unzip();

    let schema = Arc::new(Schema::new(vec![
        Field::new("track", DataType::Utf8, false),
        Field::new("cycles", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(tracks)),
            Arc::new(Int64Array::from(cycles)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
