//! End-to-end tests for the scentvalue binary
//!
//! Each test runs the binary against a throwaway HOME so no real config,
//! ledger or API key is picked up.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn scentvalue(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scentvalue"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("RUST_LOG")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .output()
        .expect("failed to run scentvalue")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn ledger_arg(home: &TempDir) -> String {
    home.path().join("ledger.json").display().to_string()
}

#[test]
fn test_resolve_prices_lab_notation() {
    let home = TempDir::new().unwrap();
    let output = scentvalue(home.path(), &["resolve", "1kg236", "--format", "json"]);
    assert!(output.status.success());

    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["valid"], true);
    assert_eq!(value["grossWeight"].as_f64(), Some(1236.0));
    assert_eq!(value["netWeight"].as_f64(), Some(1100.0));
    assert_eq!(value["price"].as_f64(), Some(253000.0));
}

#[test]
fn test_resolve_rejects_injection() {
    let home = TempDir::new().unwrap();
    let output = scentvalue(home.path(), &["resolve", "1;DROP", "--format", "json"]);
    assert!(output.status.success());

    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["valid"], false);
}

#[test]
fn test_add_list_and_copy_csv() {
    let home = TempDir::new().unwrap();
    let ledger = ledger_arg(&home);

    let output = scentvalue(home.path(), &["add", "636", "--label", "X", "--ledger", &ledger]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = scentvalue(home.path(), &["list", "--format", "json", "--ledger", &ledger]);
    let entries: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["label"], "X");
    assert_eq!(entries[0]["price"].as_f64(), Some(115000.0));

    let output = scentvalue(home.path(), &["copy", "csv", "--stdout", "--ledger", &ledger]);
    assert_eq!(
        stdout(&output),
        "Fragrance Name,Gross Weight (g),Net (ml),Total Price (TSh)\nX,636,500.00,115000\n"
    );
}

#[test]
fn test_invalid_weight_exits_with_error() {
    let home = TempDir::new().unwrap();
    let ledger = ledger_arg(&home);

    let output = scentvalue(home.path(), &["add", "abc", "--ledger", &ledger]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));

    let output = scentvalue(home.path(), &["total", "--format", "json", "--ledger", &ledger]);
    let total: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(total["count"], 0);
}

#[test]
fn test_export_and_clear() {
    let home = TempDir::new().unwrap();
    let ledger = ledger_arg(&home);
    let exports = home.path().join("exports");
    let exports_arg = exports.display().to_string();

    scentvalue(home.path(), &["add", "1kg236", "--ledger", &ledger]);
    let output = scentvalue(home.path(), &["export", "csv", "-o", &exports_arg, "--ledger", &ledger]);
    assert!(output.status.success());
    assert_eq!(std::fs::read_dir(&exports).unwrap().count(), 1);

    scentvalue(home.path(), &["clear", "--ledger", &ledger]);
    let output = scentvalue(home.path(), &["export", "pdf", "-o", &exports_arg, "--ledger", &ledger]);
    assert!(stdout(&output).contains("Nothing to export"));
    assert_eq!(std::fs::read_dir(&exports).unwrap().count(), 1);
}

#[test]
fn test_ask_without_key_degrades_to_message() {
    let home = TempDir::new().unwrap();
    let ledger = ledger_arg(&home);

    let output = scentvalue(home.path(), &["--ledger", &ledger, "ask", "how", "much", "is", "50ml?"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "Error: Could not connect to the fragrance assistant."
    );
}

#[test]
fn test_ask_works_with_corrupt_ledger() {
    let home = TempDir::new().unwrap();
    let ledger = ledger_arg(&home);
    std::fs::write(&ledger, "not json").unwrap();

    let output = scentvalue(home.path(), &["--ledger", &ledger, "ask", "hello"]);
    assert!(output.status.success());

    let output = scentvalue(home.path(), &["--ledger", &ledger, "list"]);
    assert_eq!(output.status.code(), Some(1));
}
