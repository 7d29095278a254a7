//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const API_KEY: &str = "sk-test-key";

/// Isolated working directory and home so no real `.env` or config file
/// leaks into a test run.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Sandbox {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// `oweb` with a scrubbed environment and no configuration at all.
    #[allow(deprecated)]
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("oweb").expect("binary built");
        cmd.current_dir(self.path())
            .env_remove("OPEN_WEBUI_API_KEY")
            .env_remove("BASE_URL")
            .env_remove("OWEB_CONFIG")
            .env_remove("OWEB_TIMEOUT")
            .env_remove("OWEB_LOG")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));
        cmd
    }

    /// `oweb` pointed at `base_url` with a valid key.
    pub fn cmd(&self, base_url: &str) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.env("OPEN_WEBUI_API_KEY", API_KEY).env("BASE_URL", base_url);
        cmd
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", API_KEY)
}
