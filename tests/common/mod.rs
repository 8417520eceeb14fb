#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_shn") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "shn.exe" } else { "shn" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve shn binary path for integration test"),
    }
}

/// Required settings pointing at a relay that refuses connections.
pub fn base_env(smartctl: &Path, devices: &str) -> Vec<(String, String)> {
    [
        ("SMTP_SERVER", "127.0.0.1"),
        ("SMTP_PORT", "1"),
        ("SENDER_EMAIL", "nas@example.com"),
        ("SENDER_PASSWORD", "hunter2"),
        ("RECIPIENT_EMAIL", "ops@example.com"),
        ("CHECK_INTERVAL", "0s"),
        ("DEVICES", devices),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .chain(std::iter::once((
        "SMARTCTL_LOCATION".to_string(),
        smartctl.display().to_string(),
    )))
    .collect()
}

/// Write an executable shell script standing in for smartctl.
#[cfg(unix)]
pub fn fake_smartctl(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("smartctl");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake smartctl");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake smartctl");
    path
}

/// Run the binary with a cleared environment plus `envs`.
pub fn run_cli_case(case_name: &str, args: &[&str], envs: &[(String, String)]) -> CmdResult {
    let root = std::env::temp_dir().join("shn-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command.args(args).env_clear().env("RUST_BACKTRACE", "1");
    if let Ok(path) = std::env::var("PATH") {
        command.env("PATH", path);
    }
    for (key, value) in envs {
        command.env(key, value);
    }
    let output = command.output().expect("execute shn command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    let _ = writeln!(log_content, "case={case_name}");
    let _ = writeln!(log_content, "bin={}", bin_path.display());
    let _ = writeln!(log_content, "args={args:?}");
    let _ = writeln!(log_content, "status={}", output.status);
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
