#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `optout` with `PATH` pointed at `bin` so only planted tools resolve.
fn optout(bin: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("optout").unwrap();
    cmd.env("PATH", bin.path())
        .env_remove("OPTOUT_ENV")
        .env_remove("OPTOUT_EXEC")
        .env_remove("OPTOUT_DRY_RUN")
        .env_remove("OPTOUT_VERBOSE")
        .env_remove("OPTOUT_JSON")
        .env_remove("RUST_LOG");
    cmd
}

/// Plant an executable shell script named `name` in `bin`.
#[cfg(unix)]
fn plant_tool(bin: &TempDir, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = bin.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// default pass
// ---------------------------------------------------------------------------

#[test]
fn quiet_run_prints_nothing_and_succeeds() {
    let bin = TempDir::new().unwrap();
    optout(&bin).assert().success().stdout("");
}

#[test]
fn dry_run_verbose_lists_env_actions_in_order() {
    let bin = TempDir::new().unwrap();
    let output = optout(&bin)
        .args(["--dry-run", "--verbose"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "DO_NOT_TRACK=1");
    assert_eq!(lines[1], "DOTNET_CLI_TELEMETRY_OPTOUT=1");
    assert_eq!(
        lines.iter().filter(|l| **l == "CHECKPOINT_DISABLE=1").count(),
        3
    );
    // No tool is installed on the temp PATH.
    assert!(!stdout.contains("gcloud"));
}

#[test]
fn show_log_alias_matches_verbose() {
    let bin = TempDir::new().unwrap();
    let a = optout(&bin).args(["--dry-run", "--show-log"]).output().unwrap();
    let b = optout(&bin).args(["--dry-run", "-v"]).output().unwrap();
    assert_eq!(a.stdout, b.stdout);
    assert!(!a.stdout.is_empty());
}

#[test]
fn flags_can_come_from_environment() {
    let bin = TempDir::new().unwrap();
    let from_flags = optout(&bin).args(["--dry-run", "--verbose"]).output().unwrap();
    let from_env = optout(&bin)
        .env("OPTOUT_DRY_RUN", "1")
        .env("OPTOUT_VERBOSE", "true")
        .output()
        .unwrap();
    assert_eq!(from_flags.stdout, from_env.stdout);
}

#[test]
fn exec_only_with_no_tools_installed_prints_nothing() {
    let bin = TempDir::new().unwrap();
    optout(&bin)
        .args(["--exec", "--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn json_report_covers_whole_catalog() {
    let bin = TempDir::new().unwrap();
    let report = stdout_json(optout(&bin).args(["--dry-run", "--json"]));
    assert_eq!(report["config"]["dry_run"], true);
    assert_eq!(report["config"]["apply_env"], true);
    assert_eq!(report["config"]["apply_exec"], true);

    let records = report["records"].as_array().unwrap();
    assert!(records.len() >= 30);
    let gcloud = records.iter().find(|r| r["id"] == "gcloud").unwrap();
    assert_eq!(gcloud["outcome"], "skipped");
    assert_eq!(gcloud["reason"], "executable_not_found");
    let dnt = records.iter().find(|r| r["id"] == "do-not-track").unwrap();
    assert_eq!(dnt["outcome"], "simulated");
    assert_eq!(dnt["line"], "DO_NOT_TRACK=1");
}

#[test]
fn json_mode_moves_action_log_to_stderr() {
    let bin = TempDir::new().unwrap();
    optout(&bin)
        .args(["--dry-run", "--verbose", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DO_NOT_TRACK=1"));
}

#[test]
fn run_flags_conflict_with_subcommands() {
    let bin = TempDir::new().unwrap();
    optout(&bin).args(["--dry-run", "list"]).assert().failure();
}

// ---------------------------------------------------------------------------
// planted tools
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn live_run_spawns_tool_with_arguments_and_exported_env() {
    let bin = TempDir::new().unwrap();
    let marker = bin.path().join("gcloud.out");
    plant_tool(&bin, "gcloud", r#"echo "$@ $DO_NOT_TRACK" > "$OPTOUT_MARKER""#);

    optout(&bin)
        .env("OPTOUT_MARKER", &marker)
        .env_remove("DO_NOT_TRACK")
        .assert()
        .success()
        .stdout("");

    let seen = std::fs::read_to_string(&marker).unwrap();
    assert_eq!(seen.trim(), "config set disable_usage_reporting true 1");
}

#[cfg(unix)]
#[test]
fn dry_run_never_spawns() {
    let bin = TempDir::new().unwrap();
    let marker = bin.path().join("gcloud.out");
    plant_tool(&bin, "gcloud", r#": > "$OPTOUT_MARKER""#);

    optout(&bin)
        .env("OPTOUT_MARKER", &marker)
        .args(["--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "gcloud config set disable_usage_reporting true\n",
        ));

    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn env_only_never_spawns_tools() {
    let bin = TempDir::new().unwrap();
    let marker = bin.path().join("gcloud.out");
    plant_tool(&bin, "gcloud", r#": > "$OPTOUT_MARKER""#);

    optout(&bin)
        .env("OPTOUT_MARKER", &marker)
        .args(["--env", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DO_NOT_TRACK=1"))
        .stdout(predicate::str::contains("gcloud").not());

    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn exec_only_logs_just_installed_tools() {
    let bin = TempDir::new().unwrap();
    plant_tool(&bin, "gcloud", "exit 0");
    plant_tool(&bin, "yarn", "exit 0");

    optout(&bin)
        .args(["--exec", "--dry-run", "--verbose"])
        .assert()
        .success()
        .stdout(concat!(
            "gcloud config set disable_usage_reporting true\n",
            "yarn config set --home enableTelemetry 0\n",
        ));
}

#[cfg(unix)]
#[test]
fn failing_tool_does_not_fail_the_run() {
    let bin = TempDir::new().unwrap();
    let marker = bin.path().join("yarn.out");
    plant_tool(&bin, "gcloud", "echo broken >&2; exit 7");
    plant_tool(&bin, "yarn", r#": > "$OPTOUT_MARKER""#);

    let report = stdout_json(
        optout(&bin)
            .env("OPTOUT_MARKER", &marker)
            .args(["--exec", "--json"]),
    );

    let records = report["records"].as_array().unwrap();
    let gcloud = records.iter().find(|r| r["id"] == "gcloud").unwrap();
    assert_eq!(gcloud["outcome"], "failed");
    assert_eq!(
        gcloud["reason"],
        "command 'gcloud' failed: exited with status 7"
    );
    // Later actions still ran.
    assert!(marker.exists());
}

#[cfg(unix)]
#[test]
fn quiet_run_with_failing_tool_prints_nothing() {
    let bin = TempDir::new().unwrap();
    plant_tool(&bin, "gcloud", "echo broken >&2; exit 7");

    optout(&bin).assert().success().stdout("").stderr("");
}

#[cfg(unix)]
#[test]
fn verbose_run_reports_failing_tool() {
    let bin = TempDir::new().unwrap();
    plant_tool(&bin, "gcloud", "exit 7");

    optout(&bin)
        .args(["--exec", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "command 'gcloud' failed: exited with status 7",
        ));
}

// ---------------------------------------------------------------------------
// list / platform
// ---------------------------------------------------------------------------

#[test]
fn list_shows_table() {
    let bin = TempDir::new().unwrap();
    optout(&bin)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("do-not-track"))
        .stdout(predicate::str::contains(
            "gcloud config set disable_usage_reporting true",
        ));
}

#[test]
fn list_all_includes_every_platform() {
    let bin = TempDir::new().unwrap();
    let all = stdout_json(optout(&bin).args(["list", "--all", "--json"]));
    let ids: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"automatedlab"));
    assert!(ids.contains(&"homebrew"));

    let local = stdout_json(optout(&bin).args(["list", "--json"]));
    assert!(local.as_array().unwrap().len() < ids.len());
}

#[test]
fn list_json_carries_documentation() {
    let bin = TempDir::new().unwrap();
    let all = stdout_json(optout(&bin).args(["list", "--all", "--json"]));
    let gcloud = all
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == "gcloud")
        .unwrap();
    assert_eq!(gcloud["kind"], "command");
    assert_eq!(gcloud["executable"], "gcloud");
    assert_eq!(gcloud["arguments"][0], "config");
    assert!(gcloud["source_url"].as_str().unwrap().starts_with("https://"));
}

#[cfg(target_os = "linux")]
#[test]
fn platform_reports_linux() {
    let bin = TempDir::new().unwrap();
    optout(&bin)
        .arg("platform")
        .assert()
        .success()
        .stdout("linux\n");

    let json = stdout_json(optout(&bin).args(["platform", "--json"]));
    assert_eq!(json["platform"], "linux");
}
