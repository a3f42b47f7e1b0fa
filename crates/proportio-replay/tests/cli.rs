//! Integration test: run the replay binary on a script file.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

use pretty_assertions::assert_eq;

fn write_script(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn replay_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_proportio-replay"))
}

#[test]
fn json_output_contains_snapshot() {
    let script = write_script(
        "cli-json.json",
        r##"{
            "config": {"lock_palette": ["#123456"]},
            "commands": [
                {"type": "add_ruler", "start_point": {"x": 0, "y": 0}, "end_point": {"x": 30, "y": 0}},
                {"type": "add_ruler", "start_point": {"x": 0, "y": 0}, "end_point": {"x": 0, "y": 20}},
                {"type": "toggle_compare", "id": 1},
                {"type": "toggle_compare", "id": 2}
            ]
        }"##,
    );

    let output = replay_bin()
        .arg("--json")
        .arg("--fixed-clock")
        .arg("99")
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lock = &json["snapshot"]["locks"][0];
    assert_eq!(lock["simple_ratio"], "3:2");
    assert_eq!(lock["actual_ratio"], "3:2");
    assert_eq!(lock["color"], "#123456");
    assert_eq!(lock["created_at"], 99);
    assert_eq!(json["steps"][3]["outcome"]["outcome"], "lock_created");
}

#[test]
fn config_flag_overrides_script_config() {
    let script = write_script(
        "cli-config.json",
        r#"[
            {"type": "add_ruler", "start_point": {"x": 0, "y": 0}, "end_point": {"x": 10, "y": 0}}
        ]"#,
    );

    let output = replay_bin()
        .arg("--json")
        .arg("--config-json")
        .arg(r#"{"default_divisions": 7}"#)
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["snapshot"]["rulers"][0]["divisions"], 7);
}

#[test]
fn human_report_is_default() {
    let script = write_script("cli-report.json", "[]");
    let output = replay_bin().arg(&script).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Replay Report"));
    assert!(stdout.contains("Commands: 0 (0 ignored)"));
}

#[test]
fn invalid_config_fails() {
    let script = write_script("cli-invalid.json", "[]");
    let output = replay_bin()
        .arg("--config-json")
        .arg(r#"{"lock_palette": []}"#)
        .arg(&script)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("lock_palette"));
}

#[test]
fn missing_script_fails() {
    let output = replay_bin().arg("/no/such/script.json").output().unwrap();
    assert!(!output.status.success());
}
