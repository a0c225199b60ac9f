//! Tests for CLI argument parsing and the featsel binary

use assert_cmd::Command;
use clap::Parser;
use featsel::cli::{Cli, KernelArg};
use featsel::pipeline::{Gamma, KernelType};
use predicates::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["featsel", "-i", "data.csv"]);

    assert_eq!(cli.correlation_threshold, 0.9);
    assert_eq!(cli.significance_level, 0.05);
    assert_eq!(cli.test_fraction, 0.2);
    assert_eq!(cli.seed, 42);
    assert_eq!(cli.kernel, KernelArg::Rbf);
    assert_eq!(cli.gamma, Gamma::Scale);
    assert_eq!(cli.regularization, 1.0);
    assert_eq!(cli.max_epochs, 500);
    assert_eq!(cli.infer_schema_length, 10000);
    assert!(cli.target.is_none());
    assert!(cli.output.is_none());
    assert!(cli.report.is_none());
    assert!(cli.drop_columns.is_empty());
}

#[test]
fn test_cli_custom_thresholds() {
    let cli = Cli::parse_from([
        "featsel",
        "-i",
        "data.csv",
        "--correlation-threshold",
        "0.8",
        "--alpha",
        "0.01",
        "--test-fraction",
        "0.25",
        "--seed",
        "7",
    ]);

    assert_eq!(cli.correlation_threshold, 0.8);
    assert_eq!(cli.significance_level, 0.01);

    let config = cli.evaluation_config();
    assert_eq!(config.test_fraction, 0.25);
    assert_eq!(config.seed, 7);
}

#[test]
fn test_cli_kernel_settings() {
    let cli = Cli::parse_from([
        "featsel", "-i", "data.csv", "--kernel", "poly", "--degree", "2", "--gamma", "0.5", "-c",
        "10",
    ]);

    assert_eq!(cli.kernel_type(), KernelType::Polynomial { degree: 2 });
    let config = cli.evaluation_config();
    assert_eq!(config.svm.gamma, Gamma::Value(0.5));
    assert_eq!(config.svm.regularization, 10.0);
}

#[test]
fn test_cli_drop_columns_are_comma_separated() {
    let cli = Cli::parse_from(["featsel", "-i", "data.csv", "--drop-columns", "a,b,c"]);
    assert_eq!(cli.drop_columns, vec!["a", "b", "c"]);
    assert_eq!(cli.layout().drop_columns, vec!["a", "b", "c"]);
}

#[test]
fn test_cli_target_mapping() {
    let cli = Cli::parse_from([
        "featsel",
        "-i",
        "data.csv",
        "--event-value",
        "M",
        "--non-event-value",
        "B",
    ]);

    let mapping = cli.layout().mapping.unwrap();
    assert_eq!(mapping.event_value, "M");
    assert_eq!(mapping.non_event_value, "B");
}

#[test]
fn test_cli_event_value_requires_non_event_value() {
    let result = Cli::try_parse_from(["featsel", "-i", "data.csv", "--event-value", "M"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_invalid_values() {
    assert!(Cli::try_parse_from(["featsel", "-i", "d.csv", "--test-fraction", "1.0"]).is_err());
    assert!(Cli::try_parse_from(["featsel", "-i", "d.csv", "--test-fraction", "0"]).is_err());
    assert!(Cli::try_parse_from(["featsel", "-i", "d.csv", "--gamma", "zero"]).is_err());
    assert!(Cli::try_parse_from(["featsel", "-i", "d.csv", "-c", "-1"]).is_err());
    assert!(Cli::try_parse_from(["featsel", "-i", "d.csv", "--kernel", "sigmoid"]).is_err());
}

#[test]
fn test_cli_requires_input() {
    assert!(Cli::try_parse_from(["featsel"]).is_err());
}

#[test]
fn test_binary_reports_both_accuracies() {
    let mut df = common::create_synthetic_diagnostic_dataframe(120, 11);
    let (temp_dir, input) = common::create_temp_csv(&mut df);
    let report = temp_dir.path().join("report.json");
    let output = temp_dir.path().join("selected.csv");

    Command::cargo_bin("featsel")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Accuracy with feature selection: \d\.\d{4}\n").unwrap())
        .stdout(
            predicate::str::is_match(r"Accuracy without feature selection: \d\.\d{4}\n")
                .unwrap(),
        );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["initial_features"], 30);
    assert_eq!(json["metadata"]["target_column"], "diagnosis");
    assert_eq!(json["features"].as_array().unwrap().len(), 30);

    let accuracy = json["evaluations"]["all_features"]["accuracy"]
        .as_f64()
        .unwrap();
    assert!((0.0..=1.0).contains(&accuracy));

    assert!(output.exists());
}

#[test]
fn test_binary_fails_on_missing_input() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("featsel")
        .unwrap()
        .arg("-i")
        .arg(temp_dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
