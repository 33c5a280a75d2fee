//! Integration tests for the `overlap` CLI binary.
//!
//! Sources are saved When2Meet pages under `tests/fixtures/`, so no network
//! access is needed. Every fixture page starts at Tue 04 Mar 2025 09:00 EST
//! with 15-minute slots:
//!
//! - alpha:   best 09:15–10:00 (3 of 3 people)
//! - bravo:   best 09:30–10:15
//! - charlie: best 10:30–11:00
//! - delta:   best 09:15–10:15 (1 person)
//! - broken:  no availability data

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to a fixture page, as a `&'static str`.
macro_rules! page {
    ($name:literal) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/", $name, ".html")
    };
}

fn overlap() -> Command {
    let mut cmd = Command::cargo_bin("overlap").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper: write a config file that lives as long as the returned handle.
fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ─────────────────────────────────────────────────────────────────────────────
// Pairwise
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn pairwise_finds_common_window() {
    overlap()
        .args(["compare", page!("alpha"), page!("bravo")])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Overlapping slots between Team Alpha & Friends and Team Bravo:",
        ))
        .stdout(predicate::str::contains(
            "  - Tue 04 Mar 2025 09:30 AM - 10:00 AM EST",
        ));
}

#[test]
fn pairwise_reports_each_opponent() {
    overlap()
        .args(["compare", page!("alpha"), page!("bravo"), page!("charlie")])
        .assert()
        .success()
        .stdout(predicate::str::contains("and Team Bravo:"))
        .stdout(predicate::str::contains(
            "No overlapping slots found between Team Alpha & Friends and Team Charlie",
        ));
}

#[test]
fn broken_opponent_is_reported_and_others_continue() {
    let broken = page!("broken");
    overlap()
        .args(["compare", page!("alpha"), broken, page!("bravo")])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Error processing {broken}: Extraction failed: no TimeOfSlot data found in page"
        )))
        .stdout(predicate::str::contains("and Team Bravo:"));
}

#[test]
fn invalid_link_opponent_is_reported() {
    overlap()
        .args(["compare", page!("alpha"), "https://www.when2meet.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error processing https://www.when2meet.com/: Invalid source",
        ));
}

#[test]
fn broken_anchor_fails_the_run() {
    overlap()
        .args(["compare", page!("broken"), page!("alpha"), page!("bravo")])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error processing anchor"));
}

#[test]
fn single_source_is_a_usage_error() {
    overlap()
        .args(["compare", page!("alpha")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least two sources"));
}

#[test]
fn longer_meeting_without_a_long_enough_run() {
    overlap()
        .args(["compare", page!("alpha"), page!("delta"), "--duration", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Common best times between Team Alpha & Friends and Team Delta (3 slots), but none long enough for 60 minutes",
        ));
}

#[test]
fn duration_rounds_window_end_up_to_whole_slots() {
    // 40 minutes on a 15-minute grid covers three slots.
    overlap()
        .args(["compare", page!("alpha"), page!("delta"), "-d", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  - Tue 04 Mar 2025 09:15 AM - 10:00 AM EST",
        ));
}

#[test]
fn timezone_changes_rendering_only() {
    overlap()
        .args(["compare", page!("alpha"), page!("bravo"), "--timezone", "UTC"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  - Tue 04 Mar 2025 02:30 PM - 03:00 PM UTC",
        ));
}

#[test]
fn unknown_timezone_fails() {
    overlap()
        .args(["compare", page!("alpha"), page!("bravo"), "--timezone", "Nowhere/City"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone: Nowhere/City"));
}

#[test]
fn zero_interval_fails() {
    overlap()
        .args(["compare", page!("alpha"), page!("bravo"), "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid meeting window settings"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn aggregate_requires_every_group() {
    overlap()
        .args([
            "compare",
            "--mode",
            "aggregate",
            page!("alpha"),
            page!("bravo"),
            page!("delta"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Overlapping slots across Team Alpha & Friends, Team Bravo, Team Delta:",
        ))
        .stdout(predicate::str::contains(
            "  - Tue 04 Mar 2025 09:30 AM - 10:00 AM EST",
        ));
}

#[test]
fn aggregate_without_common_time() {
    overlap()
        .args([
            "compare",
            "--mode",
            "aggregate",
            page!("alpha"),
            page!("bravo"),
            page!("charlie"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No overlapping slots found across Team Alpha & Friends, Team Bravo, Team Charlie",
        ));
}

#[test]
fn aggregate_tolerates_a_broken_first_source() {
    overlap()
        .args([
            "compare",
            "--mode",
            "aggregate",
            page!("broken"),
            page!("alpha"),
            page!("bravo"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlapping slots across"))
        .stdout(predicate::str::contains("Error processing"));
}

#[test]
fn aggregate_with_one_surviving_source_reports_no_overlap() {
    overlap()
        .args([
            "compare",
            "--mode",
            "aggregate",
            page!("alpha"),
            page!("broken"),
            "no/such/page.html",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlapping slots").not())
        .stdout(predicate::str::contains(
            "Only 1 source could be processed; at least two are needed to compare",
        ))
        .stdout(predicate::str::contains(format!(
            "Error processing {}",
            page!("broken")
        )))
        .stdout(predicate::str::contains("Error processing no/such/page.html"));
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn pairwise_json_output() {
    let output = overlap()
        .args([
            "compare",
            page!("alpha"),
            page!("bravo"),
            page!("broken"),
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "pairwise");
    assert_eq!(json["timezone"], "America/New_York");
    assert_eq!(json["duration_minutes"], 30);
    assert_eq!(json["anchor"]["name"], "Team Alpha & Friends");

    let pairs = json["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["status"], "windows");
    assert_eq!(pairs[0]["windows"][0]["start"], 1_741_098_600);
    assert_eq!(pairs[0]["windows"][0]["end"], 1_741_100_400);
    assert_eq!(pairs[1]["status"], "error");
    assert!(pairs[1]["other"]["name"].is_null());
}

#[test]
fn aggregate_json_output() {
    let output = overlap()
        .args([
            "compare",
            "--mode",
            "aggregate",
            page!("alpha"),
            page!("broken"),
            page!("charlie"),
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "aggregate");
    assert_eq!(json["sources"].as_array().unwrap().len(), 2);
    assert_eq!(json["result"]["status"], "no_overlap");
    assert_eq!(json["failures"][0]["error"]["kind"], "extraction");
}

// ─────────────────────────────────────────────────────────────────────────────
// Config file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn config_file_supplies_defaults() {
    let config = config_file("mode = \"aggregate\"\ntimezone = \"UTC\"\n");
    overlap()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["compare", page!("alpha"), page!("bravo")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlapping slots across"))
        .stdout(predicate::str::contains("02:30 PM - 03:00 PM UTC"));
}

#[test]
fn flags_override_config_file() {
    let config = config_file("mode = \"aggregate\"\nduration_minutes = 60\n");
    overlap()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["compare", page!("alpha"), page!("bravo")])
        .args(["--mode", "pairwise", "--duration", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlapping slots between"));
}

#[test]
fn unknown_config_key_fails() {
    let config = config_file("colour = \"blue\"\n");
    overlap()
        .args(["--config", config.path().to_str().unwrap()])
        .args(["compare", page!("alpha"), page!("bravo")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn missing_config_file_fails() {
    overlap()
        .args(["--config", "/nonexistent/overlap.toml"])
        .args(["compare", page!("alpha"), page!("bravo")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Best times of a single page
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn best_lists_slots_with_names() {
    overlap()
        .args(["best", page!("alpha")])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Best times for Team Alpha & Friends (3 of 3 participants):",
        ))
        .stdout(predicate::str::contains(
            "  - Tue 04 Mar 2025 09:15 AM EST: Ana, Ben, Cam",
        ))
        .stdout(predicate::str::contains("09:45 AM EST"))
        .stdout(predicate::str::contains("10:00 AM EST").not());
}

#[test]
fn best_json_output() {
    let output = overlap()
        .args(["best", page!("bravo"), "--format", "json", "--timezone", "UTC"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "Team Bravo");
    assert_eq!(json["timezone"], "UTC");
    assert_eq!(json["max_count"], 2);
    assert_eq!(json["total_participants"], 2);
    assert_eq!(json["best"].as_array().unwrap().len(), 3);
    assert_eq!(json["best"][0]["participants"][1], "Eli");
}

#[test]
fn best_of_broken_page_fails() {
    overlap()
        .args(["best", page!("broken")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no TimeOfSlot data"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    overlap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("best"));
}

#[test]
fn compare_requires_sources() {
    overlap().arg("compare").assert().failure();
}
