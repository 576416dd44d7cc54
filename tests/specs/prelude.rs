// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared builders for CLI specs.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// The workspace's `cw` binary, next to the test executable's `deps/` dir.
pub fn cw_binary() -> PathBuf {
    if let Some(path) = std::env::var_os("CARGO_BIN_EXE_cw") {
        return PathBuf::from(path);
    }
    let exe = std::env::current_exe().unwrap();
    let profile_dir = exe.parent().and_then(Path::parent).unwrap();
    let path = profile_dir.join(format!("cw{}", std::env::consts::EXE_SUFFIX));
    assert!(path.exists(), "{} not built; run `cargo build -p cw` first", path.display());
    path
}

/// `cw` with no state directory configured.
pub fn cli() -> CliBuilder {
    CliBuilder { args: Vec::new(), env: Vec::new() }
}

pub struct CliBuilder {
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.env.push((key.to_string(), value.as_ref().display().to_string()));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(cw_binary());
        cmd.env("NO_COLOR", "1").env_remove("COLOR").env_remove("CW_STATE_DIR");
        for key in ["CW_HOST", "CW_REFERENCE_PATH", "CW_LOG", "XDG_STATE_HOME"] {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd.args(&self.args);
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let output = self.command().output().unwrap();
        let run = RunAssert::from(output);
        assert_eq!(run.code, 0, "expected success\nstdout:\n{}\nstderr:\n{}", run.stdout, run.stderr);
        run
    }

    pub fn fails_with(self, code: i32) -> RunAssert {
        let output = self.command().output().unwrap();
        let run = RunAssert::from(output);
        assert_eq!(run.code, code, "unexpected exit\nstdout:\n{}\nstderr:\n{}", run.stdout, run.stderr);
        run
    }
}

pub struct RunAssert {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}

/// A temporary `CW_STATE_DIR`.
pub struct StateDir {
    dir: TempDir,
}

impl StateDir {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// zstd-compressed `reference.json.zst` holding `json`.
    pub fn reference_zst(&self, json: &str) -> PathBuf {
        let path = self.dir.path().join("reference.json.zst");
        std::fs::write(&path, zstd::encode_all(json.as_bytes(), 3).unwrap()).unwrap();
        path
    }

    pub fn cw(&self) -> CliBuilder {
        cli().env("CW_STATE_DIR", self.path())
    }
}
