/// Common test utilities and helpers for gpm tests

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// A throwaway workspace root with helpers to lay out repositories
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Workspace root (`<tmp>/src`, created on first use)
    pub fn root(&self) -> PathBuf {
        let root = self.temp_dir.child("src");
        root.create_dir_all().expect("Failed to create workspace root");
        root.path().to_path_buf()
    }

    /// Create `<root>/<rel>` with a `.git` directory inside
    pub fn add_repo(&self, rel: &str) -> PathBuf {
        let repo = self.temp_dir.child("src").child(rel);
        repo.child(".git")
            .create_dir_all()
            .expect("Failed to create repository");
        repo.child("README.md")
            .write_str("# test repository\n")
            .expect("Failed to write README");
        repo.path().to_path_buf()
    }

    /// Create a plain directory beneath the root
    pub fn add_dir(&self, rel: &str) -> PathBuf {
        let dir = self.temp_dir.child("src").child(rel);
        dir.create_dir_all().expect("Failed to create directory");
        dir.path().to_path_buf()
    }

    /// Write a config file pointing at this workspace and return its path
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let config = self.temp_dir.child("config.yml");
        config
            .write_str(&format!(
                "workspace_root: \"{}\"\n{}",
                self.root().display(),
                extra
            ))
            .expect("Failed to write test config");
        config.path().to_path_buf()
    }

    /// The three-repository layout used across tests: two owners on one
    /// source, with a vendored repository nested inside the first.
    pub fn standard_layout(&self) {
        self.add_repo("github.com/alice/proj1");
        self.add_repo("github.com/bob/proj2");
        self.add_repo("github.com/alice/proj1/vendor/lib");
    }
}

/// Build a gpm command with an isolated config directory
pub fn gpm_command(config: &Path, args: &[&str]) -> Command {
    let config_home = config.parent().unwrap_or(config);

    let mut command = Command::new(env!("CARGO_BIN_EXE_gpm"));
    command
        .arg("--config")
        .arg(config)
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG");
    command
}

/// Run the gpm binary with an isolated config directory
pub fn gpm(config: &Path, args: &[&str]) -> Output {
    gpm_command(config, args)
        .output()
        .expect("Failed to execute gpm")
}

/// Run the gpm binary without a config argument
pub fn gpm_bare(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gpm"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute gpm")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assertion helper for CLI output
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}
