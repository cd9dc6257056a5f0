use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway taskbox data directory
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_tasks(&self, blob: &str) {
        fs::write(self.tasks_file(), blob).expect("write tasks blob");
    }

    pub fn read_tasks(&self) -> Option<String> {
        fs::read_to_string(self.tasks_file()).ok()
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("config.toml"), contents).expect("write config");
    }

    /// The taskbox binary pointed at this directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskbox").expect("binary");
        cmd.env("TASKBOX_DIR", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }
}
