// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end runs of the `kozaneba` binary.

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Twelve touching notes in a row plus two far-away singletons.
fn write_dataset(dir: &Path) -> PathBuf {
    let mut arguments = Vec::new();
    for i in 0..12 {
        arguments.push(serde_json::json!({
            "arg_id": format!("r{i}"),
            "argument": format!("Row note {i}. Quiet streets."),
            "x": f64::from(i) * 0.0301,
            "y": 0.0,
        }));
    }
    for i in 0..2 {
        arguments.push(serde_json::json!({
            "arg_id": format!("l{i}"),
            "argument": format!("Lonely note {i}."),
            "x": 1.0,
            "y": f64::from(i) * 0.0601,
        }));
    }
    let path = dir.join("dataset.json");
    fs::write(&path, serde_json::json!({ "arguments": arguments }).to_string())
        .expect("write dataset");
    path
}

fn kozaneba() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("kozaneba"));
    cmd.env_remove("OPENROUTER_API_KEY");
    cmd
}

#[test]
fn precompute_writes_artifact_and_reports_count() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_dataset(tmp.path());
    let out = tmp.path().join("clusters.json");

    let assert = kozaneba()
        .args(["precompute", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.starts_with("Wrote 1 clusters to "), "stdout: {stdout}");

    let artifact: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read artifact")).expect("json");
    let clusters = artifact["clusters"].as_array().expect("clusters array");
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0]["id"], "C1");
    assert_eq!(clusters[0]["noteIds"].as_array().map(Vec::len), Some(12));
    assert!(clusters[0]["summary"].as_str().is_some_and(|s| s.starts_with("Summary: ")));
    assert!(artifact["world"]["width"].as_f64().is_some_and(|w| w > 0.0));
}

#[test]
fn precompute_min_size_keeps_singletons() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_dataset(tmp.path());
    let out = tmp.path().join("clusters.json");

    kozaneba()
        .args(["precompute", "--min-size", "1", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let artifact: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read artifact")).expect("json");
    assert_eq!(artifact["clusters"].as_array().map(Vec::len), Some(3));
}

#[test]
fn select_prints_contained_texts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_dataset(tmp.path());

    // Cells 0 through 2 of the row, fully contained.
    let assert = kozaneba()
        .args(["select", "--rect", "0,0,360,120", "--input"])
        .arg(&input)
        .assert()
        .success();
    let export: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json");
    let texts: Vec<&str> = export["texts"]
        .as_array()
        .expect("texts")
        .iter()
        .filter_map(|t| t.as_str())
        .collect();
    assert_eq!(
        texts,
        [
            "Row note 0. Quiet streets.",
            "Row note 1. Quiet streets.",
            "Row note 2. Quiet streets.",
        ]
    );
    assert_eq!(export["range"]["w"], 360.0);
}

#[test]
fn render_writes_svg_with_clusters() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_dataset(tmp.path());
    let artifact = tmp.path().join("clusters.json");
    let svg = tmp.path().join("frame.svg");

    kozaneba()
        .args(["precompute", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&artifact)
        .assert()
        .success();
    kozaneba()
        .args(["render", "--width", "640", "--height", "480", "--zoom-in", "1"])
        .args(["--style", "sticky", "--input"])
        .arg(&input)
        .arg("--clusters")
        .arg(&artifact)
        .arg("--output")
        .arg(&svg)
        .assert()
        .success();

    let text = fs::read_to_string(&svg).expect("read svg");
    assert!(text.starts_with("<svg"));
    assert!(text.contains(r#"width="640""#));
    assert!(text.trim_end().ends_with("</svg>"));
}

#[test]
fn missing_dataset_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    kozaneba()
        .args(["select", "--rect", "0,0,1,1", "--input"])
        .arg(tmp.path().join("absent.json"))
        .assert()
        .failure();
}

#[test]
fn empty_dataset_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("empty.json");
    fs::write(&input, r#"{ "arguments": [] }"#).expect("write");
    kozaneba()
        .args(["precompute", "--output", "out.json", "--input"])
        .arg(&input)
        .current_dir(tmp.path())
        .assert()
        .failure();
}
