//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CORPUS: &str = r#"[
    {"id": "a", "tags": ["x"], "text": "apple banana"},
    {"id": "b", "tags": ["x", "y"], "text": "banana cherry"},
    {"id": "c", "tags": ["z"], "text": "durian"}
]"#;

fn workspace() -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    fs::write(tmp.path().join("corpus.json"), CORPUS).expect("write corpus");
    tmp
}

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("idftf-rank"));
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("idftf-rank"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("idftf-rank"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("idftf-rank"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rank tagged free-text documents"))
        .stdout(predicate::str::contains("rank"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_rank_by_predicate() {
    let dir = workspace();
    cmd(&dir)
        .args(["rank", "--corpus", "corpus.json", "--selector", "text", "--query", "banana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top matches for query: banana (2 of 2)"))
        .stdout(predicate::str::contains("- a (relevance 1.00"))
        .stdout(predicate::str::contains("- b (relevance 1.00"))
        .stdout(predicate::str::contains("durian").not());
}

#[test]
fn test_rank_by_tag_as_json() {
    let dir = workspace();
    let output = cmd(&dir)
        .args(["rank", "--corpus", "corpus.json", "-s", "text", "--tag", "x", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let results = json["results"].as_array().expect("results array");
    let ids: Vec<&str> = results.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(results[0]["relevance"], serde_json::json!(0.55));
    assert_eq!(results[1]["relevance"], serde_json::json!(0.42));
    assert_eq!(results[1]["has_all_tags"], serde_json::json!(true));
}

#[test]
fn test_rank_without_query_lists_everything() {
    let dir = workspace();
    cmd(&dir)
        .args(["rank", "--corpus", "corpus.json", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents (2 of 3, no query given)"));
}

#[test]
fn test_rank_rejects_unknown_tag() {
    let dir = workspace();
    cmd(&dir)
        .args(["rank", "--corpus", "corpus.json", "--tag", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tag: nope"));
}

#[test]
fn test_configured_domain_rejects_corpus_tags() {
    let dir = workspace();
    fs::write(dir.path().join("idftf-rank.toml"), "[tags]\nx = \"Fresh Produce\"\n")
        .expect("write config");
    cmd(&dir)
        .args(["rank", "--corpus", "corpus.json", "--tag", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("uses a tag outside the domain"));
}

#[test]
fn test_rank_reports_missing_corpus() {
    let dir = TempDir::new().expect("temp dir");
    cmd(&dir)
        .args(["rank", "--corpus", "missing.json", "--query", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read corpus"));
}

#[test]
fn test_stats_as_json() {
    let dir = workspace();
    let output = cmd(&dir)
        .args(["stats", "--corpus", "corpus.json", "-s", "text", "-q", "banana", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["candidate_count"], serde_json::json!(2));
    assert_eq!(json["key_count"], serde_json::json!(1));
    assert_eq!(json["terms"]["strongest_key"], serde_json::json!("banana"));
    assert_eq!(json["terms"]["keys"][0]["weighted_count"], serde_json::json!(4));
}

#[test]
fn test_stats_requires_query() {
    let dir = workspace();
    cmd(&dir)
        .args(["stats", "--corpus", "corpus.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Statistics are built per query"));
}

#[test]
fn test_completions_for_bash() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("idftf-rank"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("idftf-rank"));
}
