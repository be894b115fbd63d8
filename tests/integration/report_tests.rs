use clap::Parser;
use dupfinder::cli::Cli;
use dupfinder::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn make_pairs(dir: &Path, count: usize) {
    for i in 0..count {
        let content = format!("pair {}", i);
        fs::write(dir.join(format!("{:02}_a", i)), &content).unwrap();
        fs::write(dir.join(format!("{:02}_b", i)), &content).unwrap();
    }
}

fn run(args: &[&str], input: &str) -> (ExitCode, String) {
    let _lock = crate::env_lock();
    let cli = Cli::try_parse_from(args).unwrap();
    let mut output = Vec::new();
    let code = dupfinder::run_with_io(&cli, input.as_bytes(), &mut output, false).unwrap();
    (code, String::from_utf8(output).unwrap())
}

fn isolated_config() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn test_report_for_empty_directory() {
    let dir = tempdir().unwrap();
    let (_cfg, cfg_path) = isolated_config();

    let (code, output) = run(
        &["dupfinder", "-q", "--config", &cfg_path, dir.path().to_str().unwrap()],
        "",
    );

    assert_eq!(code, ExitCode::Success);
    assert_eq!(output, "found 0 group(s) & 0 duplicate(s).\n\n");
}

#[test]
fn test_report_suppresses_listing_over_threshold() {
    let dir = tempdir().unwrap();
    make_pairs(dir.path(), 16);
    let (_cfg, cfg_path) = isolated_config();

    let (_, output) = run(
        &["dupfinder", "-q", "--config", &cfg_path, dir.path().to_str().unwrap()],
        "",
    );

    assert!(output.starts_with("found 16 group(s) & 16 duplicate(s).\n"));
    assert!(!output.contains("[Group"));
}

#[test]
fn test_report_threshold_from_cli() {
    let dir = tempdir().unwrap();
    make_pairs(dir.path(), 16);
    let (_cfg, cfg_path) = isolated_config();

    let (_, output) = run(
        &[
            "dupfinder",
            "-q",
            "--config",
            &cfg_path,
            "--listing-threshold",
            "20",
            dir.path().to_str().unwrap(),
        ],
        "",
    );

    assert!(output.contains("[Group 16]"));
}

#[test]
fn test_non_interactive_log_flag_writes_log() {
    let dir = tempdir().unwrap();
    let logs = tempdir().unwrap();
    make_pairs(dir.path(), 2);
    let (_cfg, cfg_path) = isolated_config();

    let (_, output) = run(
        &[
            "dupfinder",
            "-q",
            "--config",
            &cfg_path,
            dir.path().to_str().unwrap(),
            "--log",
            "--log-dir",
            logs.path().to_str().unwrap(),
        ],
        "",
    );

    let entries: Vec<_> = fs::read_dir(logs.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let log_path = entries[0].as_ref().unwrap().path();
    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.starts_with("[Group 1]\n"));
    assert!(content.contains("[Group 2]\n"));
    assert!(content.ends_with("\n\n"));
    assert!(output.contains("Log written to"));
}

#[test]
fn test_interactive_session_logs_and_removes() {
    let dir = tempdir().unwrap();
    let logs = tempdir().unwrap();
    make_pairs(dir.path(), 1);
    fs::write(dir.path().join("unique"), b"unique").unwrap();
    let cfg_dir = tempdir().unwrap();
    let cfg_path = cfg_dir.path().join("config.toml");
    fs::write(
        &cfg_path,
        format!(
            "permanent = true\nlog_dir = \"{}\"\n",
            logs.path().display().to_string().replace('\\', "\\\\")
        ),
    )
    .unwrap();

    let script = format!("{}\n/continue\ny\ny\n", dir.path().display());
    let (code, output) = run(
        &["dupfinder", "-q", "--config", cfg_path.to_str().unwrap()],
        &script,
    );

    assert_eq!(code, ExitCode::Success);
    assert!(output.contains("found 1 group(s) & 1 duplicate(s)."));
    assert!(output.contains("Create log? (y/n): "));
    assert!(output.contains("Safely remove duplicates? (y/n): "));
    assert!(output.contains("Removed: 1 file(s)"));
    assert!(dir.path().join("00_a").exists());
    assert!(!dir.path().join("00_b").exists());
    assert!(dir.path().join("unique").exists());
    assert_eq!(fs::read_dir(logs.path()).unwrap().count(), 1);
}

#[test]
fn test_interactive_session_declines_everything() {
    let dir = tempdir().unwrap();
    make_pairs(dir.path(), 1);
    let (_cfg, cfg_path) = isolated_config();

    let script = format!("{}\n/continue\nn\nn\n", dir.path().display());
    let (code, output) = run(&["dupfinder", "-q", "--config", &cfg_path], &script);

    assert_eq!(code, ExitCode::Success);
    assert!(!output.contains("Removed:"));
    assert!(dir.path().join("00_b").exists());
}

#[test]
fn test_interactive_exit_skips_scan() {
    let (_cfg, cfg_path) = isolated_config();
    let (code, output) = run(&["dupfinder", "-q", "--config", &cfg_path], "/exit\n");

    assert_eq!(code, ExitCode::Success);
    assert!(!output.contains("found"));
}

#[test]
fn test_delete_flag_asks_without_yes() {
    let dir = tempdir().unwrap();
    make_pairs(dir.path(), 1);
    let (_cfg, cfg_path) = isolated_config();

    let (_, output) = run(
        &[
            "dupfinder",
            "-q",
            "--config",
            &cfg_path,
            dir.path().to_str().unwrap(),
            "--delete",
            "--permanent",
        ],
        "n\n",
    );

    assert!(output.contains("Safely remove duplicates? (y/n): "));
    assert!(dir.path().join("00_b").exists());

    let (_, output) = run(
        &[
            "dupfinder",
            "-q",
            "--config",
            &cfg_path,
            dir.path().to_str().unwrap(),
            "--delete",
            "--permanent",
            "--yes",
        ],
        "",
    );

    assert!(!output.contains("(y/n)"));
    assert!(output.contains("Removed: 1 file(s)"));
    assert!(!dir.path().join("00_b").exists());
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    make_pairs(dir.path(), 1);
    let (_cfg, cfg_path) = isolated_config();

    let (_, output) = run(
        &[
            "dupfinder",
            "-q",
            "--config",
            &cfg_path,
            "--output",
            "json",
            dir.path().to_str().unwrap(),
        ],
        "",
    );

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["groups"].as_array().unwrap().len(), 1);
    assert_eq!(value["summary"]["duplicate_files"], 1);
}
