#![allow(missing_docs)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn fileorg(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fileorg").expect("binary is built");
    cmd.env("FILEORG_CONFIG", config_dir.join("absent.toml"))
        .env_remove("FILEORG_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn generate_then_run_reports_json() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("items.csv");

    fileorg(dir.path())
        .args(["-q", "generate"])
        .arg(&data)
        .args(["--rows", "200", "--ids", "numeric"])
        .assert()
        .success();
    let contents = fs::read_to_string(&data).unwrap();
    assert_eq!(contents.lines().count(), 201);
    assert!(contents.starts_with("ProductID,Weight,FatContent"));

    let output = fileorg(dir.path())
        .args(["-q", "--format", "json", "run"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["records"], 200);
    let runs = report["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0]["kind"], "heap");
    assert_eq!(runs[0]["blocks_accessed"], 215);
    assert_eq!(runs[1]["kind"], "ordered");
    assert_eq!(runs[1]["blocks_accessed"], 200);
    assert_eq!(runs[1]["merge"]["merged"], 200);
    assert_eq!(runs[2]["kind"], "hash");
    assert_eq!(runs[2]["blocks_accessed"], 210);
    assert_eq!(runs[2]["total_blocks"], 10);
}

#[test]
fn run_writes_csv_table() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("items.csv");
    let table = dir.path().join("results.csv");

    fileorg(dir.path())
        .args(["-q", "generate"])
        .arg(&data)
        .args(["--rows", "50"])
        .assert()
        .success();
    fileorg(dir.path())
        .args(["-q", "run"])
        .arg(&data)
        .args(["--select-count", "3", "--delete-count", "3", "--out"])
        .arg(&table)
        .assert()
        .success();

    let csv = fs::read_to_string(&table).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "organization,blocks_accessed,total_blocks");
    assert!(lines[1].starts_with("Fixed Heap,56,"));
    assert!(lines[2].starts_with("Ordered File,50,"));
    assert_eq!(lines[3], "Static Hash,53,10");
}

#[test]
fn missing_dataset_exits_with_error() {
    let dir = tempdir().unwrap();
    let output = fileorg(dir.path()).arg("run").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no dataset"), "stderr: {stderr}");
}

#[test]
fn unreadable_dataset_exits_with_error() {
    let dir = tempdir().unwrap();
    let output = fileorg(dir.path())
        .args(["-q", "run"])
        .arg(dir.path().join("nope.csv"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed after"), "stderr: {stderr}");
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn config_profile_feeds_run_options() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "[simulation]\nnum_buckets = 4\n\n[profiles.chain]\nhash_overflow = \"chain\"\n",
    )
    .unwrap();

    let output = Command::cargo_bin("fileorg")
        .unwrap()
        .env("FILEORG_CONFIG", &config)
        .args(["--format", "json", "--profile", "chain", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let opts: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(opts["num_buckets"], 4);
    assert_eq!(opts["hash_overflow"], "chain");
    assert_eq!(opts["block_size"], 4096);
}
