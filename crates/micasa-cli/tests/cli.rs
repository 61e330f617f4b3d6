//! End-to-end tests running the `micasa` binary against temporary manifests,
//! blueprints and fake executables.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TOOL_BLUEPRINT: &str = r#"{
  "version": "2.1.0",
  "version_check": { "executable": "tool", "regex": "tool ([0-9.]+)" },
  "package_names": { "brew": "tool" }
}"#;

/// Temporary home with a manifest, a blueprint directory and a bin directory
/// that is placed first on `PATH`.
struct TestContext {
    home: TempDir,
    bin: PathBuf,
    blueprints: PathBuf,
    manifest: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp dir");
        let bin = home.path().join("bin");
        let blueprints = home.path().join("blueprints");
        std::fs::create_dir_all(&bin).expect("failed to create bin dir");
        std::fs::create_dir_all(&blueprints).expect("failed to create blueprints dir");
        let manifest = home.path().join("micasa.txt");

        Self {
            home,
            bin,
            blueprints,
            manifest,
        }
    }

    fn manifest(&self, content: &str) -> &Self {
        std::fs::write(&self.manifest, content).expect("failed to write manifest");
        self
    }

    fn blueprint(&self, name: &str, json: &str) -> &Self {
        std::fs::write(self.blueprints.join(format!("{name}.json")), json)
            .expect("failed to write blueprint");
        self
    }

    fn executable(&self, dir: &Path, name: &str, output: &str) -> &Self {
        std::fs::create_dir_all(dir).expect("failed to create dir");
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\necho '{output}'\n"))
            .expect("failed to write executable");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod executable");
        self
    }

    fn micasa_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_micasa");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", self.home.path())
            .env("PATH", format!("{}:/usr/bin:/bin", self.bin.display()))
            .env("NO_COLOR", "1")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("MICASA_MANIFEST")
            .env_remove("MICASA_BLUEPRINTS")
            .env_remove("RUST_LOG")
            .arg("--manifest")
            .arg(&self.manifest)
            .arg("--blueprints")
            .arg(&self.blueprints);
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.micasa_cmd()
            .args(args)
            .output()
            .expect("failed to run micasa")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_status_all_installed() {
    let ctx = TestContext::new();
    ctx.manifest("tool\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .executable(&ctx.bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["status"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Checking 1 package..."));
    assert!(out.contains("All packages are installed and working correctly"));
    assert!(!out.contains("Installed version"));
}

#[test]
fn test_status_verbose_shows_installed() {
    let ctx = TestContext::new();
    ctx.manifest("tool: >=3.0\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .executable(&ctx.bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["status", "--verbose"]);
    let out = stdout(&output);

    assert!(out.contains("Manifest version: >=3.0"));
    assert!(out.contains("Installed version: 2.1.0 (does not satisfy >=3.0)"));
    assert!(!out.contains("All packages are installed"));
}

#[test]
fn test_status_reports_problems() {
    let ctx = TestContext::new();
    ctx.manifest("ghost\nnobp\nsilent\n# comment\n")
        .blueprint("ghost", r#"{"version_check": {"executable": "ghost"}}"#)
        .blueprint(
            "silent",
            r#"{"version_check": {"executable": "silent", "regex": "v([0-9]+)"}}"#,
        )
        .executable(&ctx.bin, "silent", "no version here");

    let output = ctx.run(&["status"]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("Checking 3 packages..."));
    assert!(out.contains("Manifest version: (any)"));
    assert!(out.contains("Installed version: Not found (executable 'ghost' not in PATH)"));
    assert!(out.contains("⚠ Warning: No blueprint found for package 'nobp'"));
    assert!(out.contains("Installed version: Unable to parse version ('silent' found at"));
}

#[test]
fn test_status_warns_about_local_bin() {
    let ctx = TestContext::new();
    let local_bin = ctx.home.path().join(".local").join("bin");
    ctx.manifest("tool\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .executable(&local_bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["status", "-v"]);
    let out = stdout(&output);

    assert!(out.contains("but is not in your PATH. Consider adding"));
    assert!(out.contains("Installed version: 2.1.0"));
}

#[test]
fn test_status_single_package() {
    let ctx = TestContext::new();
    ctx.manifest("tool\nghost\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .blueprint("ghost", r#"{"version_check": {"executable": "ghost"}}"#)
        .executable(&ctx.bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["status", "tool"]);
    let out = stdout(&output);

    assert!(out.contains("Checking 1 package..."));
    assert!(!out.contains("ghost"));
}

#[test]
fn test_status_unknown_package_fails() {
    let ctx = TestContext::new();
    ctx.manifest("tool\n");

    let output = ctx.run(&["status", "nope"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Package 'nope' not found in manifest"));
}

#[test]
fn test_missing_manifest_fails() {
    let ctx = TestContext::new();

    let output = ctx.run(&["status"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("manifest not found"));
}

#[test]
fn test_install_already_installed() {
    let ctx = TestContext::new();
    ctx.manifest("tool\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .executable(&ctx.bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["install", "tool"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("already installed (version 2.1.0)"));
}

#[test]
fn test_install_batch_prints_summary() {
    let ctx = TestContext::new();
    ctx.manifest("tool\nnobp\n")
        .blueprint("tool", TOOL_BLUEPRINT)
        .executable(&ctx.bin, "tool", "tool 2.1.0");

    let output = ctx.run(&["install"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("2 packages processed: 1 already installed, 1 skipped"));
}

#[test]
fn test_install_requires_manifest_entry() {
    let ctx = TestContext::new();
    ctx.manifest("tool\n");

    let output = ctx.run(&["install", "other"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not found in manifest"));
}

#[test]
fn test_uninstall_missing_package() {
    let ctx = TestContext::new();
    ctx.blueprint("ghost", r#"{"version_check": {"executable": "ghost"}}"#);

    let output = ctx.run(&["uninstall", "ghost"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Package 'ghost' is not installed"));
}

#[test]
fn test_uninstall_requires_blueprint() {
    let ctx = TestContext::new();

    let output = ctx.run(&["uninstall", "nobp"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No blueprint found for package 'nobp'"));
}

#[test]
fn test_blueprint_lookup_keeps_name_case() {
    let ctx = TestContext::new();
    ctx.manifest("MyTool\n")
        .blueprint("MyTool", r#"{"version_check": {"executable": "mytool"}}"#);

    let output = ctx.run(&["status"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!out.contains("No blueprint found"));
    assert!(out.contains("Not found (executable 'mytool' not in PATH)"));
}

#[test]
fn test_info_shows_resolution() {
    let ctx = TestContext::new();
    ctx.manifest("").blueprint("tool", TOOL_BLUEPRINT);

    let output = ctx.run(&["info", "tool"]);
    let out = stdout(&output);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Resolution key"));
    assert!(out.contains("tool ([0-9.]+)"));
}

#[test]
fn test_completions() {
    let ctx = TestContext::new();
    let output = ctx.run(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("micasa"));
}
