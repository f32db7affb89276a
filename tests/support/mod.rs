#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory plus helpers to drive the binary against it.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.file(".taskboard.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        let contents = fs::read_to_string(self.file(name)).expect("read file");
        serde_json::from_str(&contents).expect("valid json")
    }

    /// `taskboard` with the data dir pinned and ambient env cleared.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("binary");
        cmd.env("TASKBOARD_DIR", self.dir.path())
            .env_remove("TASKBOARD_API_URL")
            .env_remove("TASKBOARD_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run with `--json`, assert success, and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let envelope: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }

    /// Run with `--json`, assert the exit code, and return the envelope.
    pub fn json_failure(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        let envelope: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(envelope["status"], "error");
        envelope
    }

    /// Create a task and return its id.
    pub fn new_task(&self, title: &str, status: &str) -> String {
        let data = self.json(&["task", "new", title, "--status", status]);
        data["id"].as_str().expect("task id").to_string()
    }

    /// Titles of one column, in board order.
    pub fn column_titles(&self, status: &str) -> Vec<String> {
        let data = self.json(&["task", "list", "--status", status]);
        data["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .map(|task| task["title"].as_str().expect("title").to_string())
            .collect()
    }
}
