use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const HEADER: &str = "Date,Kind,Model,Max Mode,Input (w/ Cache Write),Input (w/o Cache Write),Cache Read,Output Tokens,Total Tokens,Cost";

fn write_csv(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{HEADER}\n{body}")).expect("write test csv");
    path
}

fn run_cursorstats(args: &[&str]) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_cursorstats").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("cursorstats.exe");
        } else {
            path.push("cursorstats");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("run cursorstats");
    (output.status.success(), output.stdout, output.stderr)
}

fn run_json(args: &[&str], file: &Path) -> Value {
    let mut full: Vec<&str> = args.to_vec();
    let file_str = file.to_str().expect("utf-8 path");
    full.extend(["-j", "-f", file_str, "--timezone", "UTC"]);
    let (ok, stdout, stderr) = run_cursorstats(&full);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    serde_json::from_slice(&stdout).expect("json output")
}

const TWO_DAYS: &str = "2024-01-02T10:00:00Z,chat,gpt-4,false,100,0,50,20,170,0.05\n\
2024-01-01T09:00:00Z,chat,gpt-4,false,200,0,0,30,230,0.07\n";

#[test]
fn daily_json_sorted_most_recent_first() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let json = run_json(&["daily"], &csv);
    let rows = json.as_array().expect("array output");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"].as_str(), Some("2024-01-02"));
    assert_eq!(rows[0]["total_tokens"].as_i64(), Some(170));
    assert_eq!(rows[1]["date"].as_str(), Some("2024-01-01"));
    assert_eq!(rows[1]["requests"].as_i64(), Some(1));
}

#[test]
fn summary_json_totals_match_end_to_end_example() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let json = run_json(&["summary"], &csv);
    assert_eq!(json["requests"].as_i64(), Some(2));
    assert_eq!(json["total_tokens"].as_i64(), Some(400));
    assert!((json["cost"].as_f64().unwrap() - 0.12).abs() < 1e-9);
    assert_eq!(json["output_tokens"].as_i64(), Some(50));
}

#[test]
fn models_json_groups_and_colors() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let json = run_json(&["models"], &csv);
    let rows = json.as_array().expect("array output");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["model"].as_str(), Some("gpt-4"));
    assert_eq!(rows[0]["requests"].as_i64(), Some(2));
    assert!(rows[0]["color"].as_str().unwrap().starts_with("hsl("));
    assert!((rows[0]["tokens_percent"].as_f64().unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn ranges_json_lists_days_and_months() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let json = run_json(&["ranges"], &csv);
    let days = json["days"].as_array().unwrap();
    let months = json["months"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(months.len(), 1);
    assert_eq!(days[0]["key"].as_str(), Some("day-2024-01-02"));
    assert_eq!(days[0]["start"].as_str(), Some("2024-01-02T00:00:00+00:00"));
    assert_eq!(months[0]["label"].as_str(), Some("2024-01"));
}

#[test]
fn date_range_is_inclusive_on_both_bounds() {
    let dir = TempDir::new().unwrap();
    let body: String = (1..=10)
        .map(|d| format!("2024-01-{d:02}T12:00:00Z,chat,gpt-4,false,0,0,0,0,100,0.01\n"))
        .collect();
    let csv = write_csv(&dir, "usage.csv", &body);

    let json = run_json(&["daily", "--since", "2024-01-03", "--until", "2024-01-05"], &csv);
    let dates: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-04", "2024-01-03"]);
}

#[test]
fn reversed_range_is_silently_swapped() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let straight = run_json(&["daily", "--since", "2024-01-01", "--until", "2024-01-02"], &csv);
    let reversed = run_json(&["daily", "--since", "2024-01-02", "--until", "2024-01-01"], &csv);
    assert_eq!(straight, reversed);
    assert_eq!(straight.as_array().unwrap().len(), 2);
}

#[test]
fn model_filter_selects_subset() {
    let dir = TempDir::new().unwrap();
    let body = "2024-01-01T09:00:00Z,chat,gpt-4,false,0,0,0,0,100,0.01\n\
                2024-01-01T10:00:00Z,chat,auto,false,0,0,0,0,50,0.00\n";
    let csv = write_csv(&dir, "usage.csv", body);

    let json = run_json(&["summary", "-m", "gpt-4"], &csv);
    assert_eq!(json["requests"].as_i64(), Some(1));
    assert_eq!(json["total_tokens"].as_i64(), Some(100));

    // no selection means no constraint
    let all = run_json(&["summary"], &csv);
    assert_eq!(all["requests"].as_i64(), Some(2));
}

#[test]
fn empty_selection_prints_no_data_state() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let (ok, stdout, _) = run_cursorstats(&[
        "daily",
        "-f",
        csv.to_str().unwrap(),
        "-m",
        "nonexistent-model",
    ]);
    assert!(ok);
    assert!(String::from_utf8_lossy(&stdout).contains("No data for this selection."));
}

#[test]
fn malformed_rows_degrade_instead_of_failing() {
    let dir = TempDir::new().unwrap();
    let body = "2024-01-01T09:00:00Z,chat,gpt-4,false,0,0,0,0,100,N/A\n\
                \n\
                not-a-date,chat,gpt-4,false,0,0,0,0,999,9.99\n\
                2024-01-01T10:00:00Z,chat,gpt-4,false,0,0,0,0,200,0.10\n";
    let csv = write_csv(&dir, "usage.csv", body);

    let json = run_json(&["summary"], &csv);
    // the bad-date row vanishes; the N/A cost row still counts as a request
    assert_eq!(json["requests"].as_i64(), Some(2));
    assert_eq!(json["total_tokens"].as_i64(), Some(300));
    assert!((json["cost"].as_f64().unwrap() - 0.10).abs() < 1e-9);
}

#[test]
fn missing_file_argument_is_reported() {
    let (ok, _, stderr) = run_cursorstats(&["daily"]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("No usage file loaded"));
}

#[test]
fn unreadable_file_is_a_single_generic_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let (ok, _, stderr) = run_cursorstats(&["daily", "-f", missing.to_str().unwrap()]);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Cannot read"));
}

#[test]
fn quoted_cells_with_commas_survive_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let body = "\"2024-01-01T09:00:00Z\",\"chat, long\",\"gpt-4\",false,0,0,0,0,\"120\",\"0.30\"\n";
    let csv = write_csv(&dir, "usage.csv", body);

    let json = run_json(&["summary"], &csv);
    assert_eq!(json["requests"].as_i64(), Some(1));
    assert_eq!(json["total_tokens"].as_i64(), Some(120));
    assert!((json["cost"].as_f64().unwrap() - 0.30).abs() < 1e-9);
}

#[test]
fn table_output_renders_without_json_flag() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "usage.csv", TWO_DAYS);

    let (ok, stdout, stderr) = run_cursorstats(&[
        "daily",
        "-f",
        csv.to_str().unwrap(),
        "--timezone",
        "UTC",
        "--no-color",
    ]);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let text = String::from_utf8_lossy(&stdout);
    assert!(text.contains("2024-01-02"));
    assert!(text.contains("Total"));
}
