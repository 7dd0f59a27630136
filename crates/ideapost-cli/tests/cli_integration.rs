//! CLI integration tests for the `ideapost` binary.
//!
//! These run the compiled binary via `std::process::Command`. Each test
//! points `IDEAPOST_CONFIG` at a temp directory so a real `config.json` in
//! the working directory is never picked up. None of them reach the network.

use std::path::Path;
use std::process::{Command, Output};

fn ideapost_bin(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ideapost"));
    cmd.env("IDEAPOST_CONFIG", config);
    cmd.env_remove("IDEAPOST_SENDER_PASSWORD");
    // Suppress tracing output so assertions only match program output.
    cmd.env("RUST_LOG", "off");
    cmd
}

fn run(config: &Path, args: &[&str]) -> Output {
    ideapost_bin(config)
        .args(args)
        .output()
        .expect("failed to run ideapost")
}

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let config = dir.join("config.json");
    std::fs::write(
        &config,
        r#"{"senderEmail": "bot@example.com", "recipientEmail": "ceo@example.com", "ideasPerDay": 2, "bonusPreviewCount": 1}"#,
    )
    .unwrap();
    let catalog: Vec<serde_json::Value> = (1..=5)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "business_name": format!("Venture {i}"),
                "what_it_does": "Does useful things. More text.",
                "action_plan": ["Validate demand"],
                "is_high_risk": i == 5,
            })
        })
        .collect();
    std::fs::write(
        dir.join("ideas_database.json"),
        serde_json::to_string_pretty(&catalog).unwrap(),
    )
    .unwrap();
    config
}

// ── Version and help ────────────────────────────────────────────────────

#[test]
fn version_output() {
    let output = run(Path::new("/nonexistent/config.json"), &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ideapost"), "got: {stdout}");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "got: {stdout}");
}

#[test]
fn help_lists_subcommands() {
    let output = run(Path::new("/nonexistent/config.json"), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["send", "replies", "import", "status"] {
        assert!(stdout.contains(sub), "help should mention {sub}, got: {stdout}");
    }
}

// ── Failure exits ───────────────────────────────────────────────────────

#[test]
fn missing_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir.path().join("absent.json"), &["status"]);
    assert!(!output.status.success());
}

#[test]
fn send_without_password_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let output = run(&config, &["send"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("sent_history.json").exists());
}

#[test]
fn import_missing_file_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let output = run(&config, &["import", "/nonexistent/fresh.json"]);
    assert!(!output.status.success());
}

// ── Offline commands ────────────────────────────────────────────────────

#[test]
fn dry_run_writes_no_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let output = run(&config, &["send", "--dry-run", "--seed", "3"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dry run"), "got: {stdout}");
    assert!(!dir.path().join("sent_history.json").exists());
    assert!(!dir.path().join("pending_details.json").exists());
}

#[test]
fn import_merges_and_flags_priority() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let fresh = dir.path().join("fresh.json");
    std::fs::write(
        &fresh,
        r#"[{"id": 5, "business_name": "Duplicate"}, {"id": 99, "business_name": "Brand New"}]"#,
    )
    .unwrap();

    let output = run(&config, &["import", fresh.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let catalog: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("ideas_database.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog[5]["business_name"], "Brand New");
    assert_eq!(catalog[5]["priority"], true);
    assert_eq!(catalog[4]["business_name"], "Venture 5");
}

#[test]
fn status_shows_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let output = run(&config, &["status"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("5 ideas (1 high-risk, 0 priority)"), "got: {stdout}");
    assert!(stdout.contains("bot@example.com"));
}
