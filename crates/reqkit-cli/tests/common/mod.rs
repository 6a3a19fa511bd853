//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("reqkit.yaml");

        Self {
            temp_dir,
            config_path,
        }
    }

    /// Write a client config file
    pub fn with_config(self, config: &str) -> Self {
        std::fs::write(&self.config_path, config).expect("Failed to write config");
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command isolated from the caller's environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("reqkit").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("REQKIT_CONFIG")
            .env_remove("REQKIT_TIMEOUT_SECS")
            .env_remove("REQKIT_USER_AGENT")
            .env_remove("REQKIT_RETRIES")
            .env_remove("REQKIT_GZIP")
            .env_remove("REQKIT_LOG_LEVEL")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Create a command that reads the context's config file
    pub fn command_with_config(&self) -> Command {
        let mut cmd = self.command();
        cmd.env("REQKIT_CONFIG", &self.config_path);
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_exit_code(&self, code: i32);
    fn stdout_text(&self) -> String;
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {}, got {:?}\nstderr: {}",
            code,
            self.status.code(),
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}
