use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LOG: &str = "\
Targets are:
[ 7] = 3ff000

Normal timing run
    1     1
 3300  3350
Naive(T+C) PC timing run
    1     1
 3400  3500
Naive(T+C) PCT timing run
    1     1     1
 3600  3700  3800
Ninja(T+C) PC timing run
    1     1
 2600  2700
Ninja(T+C) PCT timing run
    1     1     1
 2800  2900  3000
Naive(T+C) PC timing run
    1     1
 3450  3550
Naive(T+C) PCT timing run
    1     1     1
 3650  3750  3850
Ninja(T+C) PC timing run
    1     1
 2650  2750
Ninja(T+C) PCT timing run
    1     1     1
 2850  2950  3050
";

fn runfold() -> Command {
    Command::cargo_bin("runfold").unwrap()
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("r4.0.tct"), LOG).unwrap();
    fs::write(dir.path().join("r4.1.tct"), LOG).unwrap();
    dir
}

#[test]
fn extract_lists_every_run() {
    let dir = setup();
    runfold()
        .arg("extract")
        .arg(dir.path().join("r4.0.tct"))
        .assert()
        .success()
        .stdout(predicate::str::contains("9 timing runs"))
        .stdout(predicate::str::contains("Ninja(T+C) PCT timing run (3 / 3 values)"));
}

#[test]
fn aggregate_reports_ratio() {
    let dir = setup();
    let pattern = format!("{}/r*.tct", dir.path().display());
    let out = runfold()
        .args(["--json", "aggregate", &pattern])
        .output()
        .unwrap();
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["baseline"]["count"], 12);
    assert_eq!(summary["baseline"]["median"], 3725.0);
    assert_eq!(summary["optimized"]["median"], 2925.0);
}

#[test]
fn aggregate_exports_csv() {
    let dir = setup();
    let pattern = format!("{}/r*.tct", dir.path().display());
    let csv_path = dir.path().join("pops.csv");
    runfold()
        .args(["aggregate", &pattern, "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ratio"));

    let text = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), 1 + 12 + 12);
    assert!(text.starts_with("track,cycles\nOriginal,3600\n"));
}

#[test]
fn empty_aggregate_writes_no_export() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/r*.tct", dir.path().display());
    let json_path = dir.path().join("pops.json");
    runfold()
        .args(["aggregate", &pattern, "--output"])
        .arg(&json_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
    assert!(!json_path.exists());
}

#[test]
fn compare_uses_requested_run_and_window() {
    let dir = setup();
    runfold()
        .arg("compare")
        .arg(dir.path().join("r4.0.tct"))
        .args(["--run", "1", "--start", "0", "--len", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("median 3650.0"))
        .stdout(predicate::str::contains("median 2850.0"))
        // 2950 / 3750 over the whole run, not the one-sample window.
        .stdout(predicate::str::contains("ratio 0.7867"));
}

#[test]
fn compare_out_of_range_run_fails() {
    let dir = setup();
    runfold()
        .arg("compare")
        .arg(dir.path().join("r4.0.tct"))
        .args(["--run", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn split_reports_both_tracks() {
    let dir = setup();
    runfold()
        .arg("split")
        .arg(dir.path().join("r4.0.tct"))
        .args(["--shared", "(T+C)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("period 2, 2 groups").count(2));
}

#[test]
fn malformed_log_fails_unless_skipped() {
    let dir = setup();
    fs::write(dir.path().join("r4.2.tct"), "Naive(T+C) PCT timing run\n1\n").unwrap();
    let pattern = format!("{}/r*.tct", dir.path().display());

    runfold()
        .args(["aggregate", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing its data lines"));

    runfold()
        .args(["aggregate", &pattern, "--skip-bad-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files"));
}

#[test]
fn config_file_sets_condition() {
    let dir = setup();
    let cfg = dir.path().join("runfold.json");
    fs::write(
        &cfg,
        format!(
            r#"{{ "histogram_glob": "{}/r*.tct", "condition": {{ "all": [ {{ "contains": "PC " }}, {{ "contains": "(T+C)" }} ] }} }}"#,
            dir.path().display()
        ),
    )
    .unwrap();

    let out = runfold()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "aggregate"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["baseline"]["count"], 8);
}

#[test]
fn series_compares_means() {
    let dir = TempDir::new().unwrap();
    let naive = dir.path().join("anc-naive-10.txt");
    let ninja = dir.path().join("anc-ninja-10.txt");
    fs::write(&naive, "10\n20\n30\n").unwrap();
    fs::write(&ninja, "5\n10\n15\n").unwrap();

    runfold()
        .arg("series")
        .arg(&naive)
        .arg(&ninja)
        .args(["--window", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ratio 0.5000"));
}

#[test]
fn extract_json_lists_records() {
    let dir = setup();
    let out = runfold()
        .args(["--json", "extract"])
        .arg(dir.path().join("r4.0.tct"))
        .output()
        .unwrap();
    assert!(out.status.success());
    let records: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 9);
    assert_eq!(records[2]["label"], "Naive(T+C) PCT timing run");
    assert_eq!(records[2]["seq_b"][0], 3600);
}

#[test]
fn generated_logs_aggregate() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("generate_sample")
        .unwrap()
        .arg("--out")
        .arg(dir.path())
        .args(["--files", "2", "--iterations", "3", "--attempts", "16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 logs"));

    let pattern = format!("{}/r4.*.tct", dir.path().display());
    let out = runfold()
        .args(["--json", "aggregate", &pattern])
        .output()
        .unwrap();
    assert!(out.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["baseline"]["count"], 2 * 3 * 16);
}
