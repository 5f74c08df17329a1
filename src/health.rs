//! Workspace diagnostics for `gpm doctor`
//!
//! Checks that the configuration can be found and that the workspace root
//! resolves to a readable directory, before anything is walked.

use crate::Config;
use std::path::{Path, PathBuf};

/// Result of system health checks
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Configuration file status (warning only, defaults are usable)
    pub config_file: CheckResult,
    /// Workspace root resolution status
    pub workspace_root: CheckResult,
    /// Workspace directory accessibility
    pub workspace_dir: CheckResult,
}

/// Result of an individual health check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
    pub is_warning: bool,
}

impl CheckResult {
    fn ok_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: None,
            is_warning: false,
        }
    }

    fn error_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn warning_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: true,
        }
    }
}

impl HealthCheck {
    /// Run all health checks
    pub fn run(config: &Config, config_path: Option<&Path>, root_override: Option<&str>) -> Self {
        let (workspace_root, resolved) = Self::check_workspace_root(config, root_override);
        let workspace_dir = match resolved {
            Some(root) => Self::check_workspace_dir(&root),
            None => CheckResult::error("Workspace directory not checked"),
        };

        Self {
            config_file: Self::check_config_file(config_path),
            workspace_root,
            workspace_dir,
        }
    }

    /// Check if all required checks passed (excludes warnings)
    pub fn all_passed(&self) -> bool {
        self.workspace_root.passed && self.workspace_dir.passed
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&CheckResult> {
        [&self.config_file, &self.workspace_root, &self.workspace_dir]
            .into_iter()
            .filter(|r| r.is_warning)
            .collect()
    }

    /// All checks with display names, in report order
    pub fn all_checks(&self) -> Vec<(&'static str, &CheckResult)> {
        vec![
            ("Configuration", &self.config_file),
            ("Workspace root", &self.workspace_root),
            ("Workspace directory", &self.workspace_dir),
        ]
    }

    fn check_config_file(config_path: Option<&Path>) -> CheckResult {
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => Config::default_config_path().ok(),
        };

        match path {
            Some(path) if path.exists() => {
                CheckResult::ok_with_details("Configuration file found", path.display().to_string())
            }
            Some(path) => CheckResult::warning_with_details(
                "No configuration file, using defaults",
                format!("Create one with: gpm init --root <dir>  ({})", path.display()),
            ),
            None => CheckResult::warning_with_details(
                "No configuration directory available",
                "Using built-in defaults",
            ),
        }
    }

    fn check_workspace_root(config: &Config, root_override: Option<&str>) -> (CheckResult, Option<PathBuf>) {
        match config.workspace_root(root_override) {
            Ok(root) => (
                CheckResult::ok_with_details("Workspace root resolved", root.display().to_string()),
                Some(root),
            ),
            Err(e) => (
                CheckResult::error_with_details(
                    "Workspace root cannot be resolved",
                    format!("{}\nSet GOPATH, pass --root, or set workspace_root in the config", e),
                ),
                None,
            ),
        }
    }

    fn check_workspace_dir(root: &Path) -> CheckResult {
        if !root.exists() {
            return CheckResult::error_with_details(
                "Workspace directory does not exist",
                root.display().to_string(),
            );
        }

        if !root.is_dir() {
            return CheckResult::error_with_details(
                "Workspace root is not a directory",
                root.display().to_string(),
            );
        }

        match std::fs::read_dir(root) {
            Ok(entries) => {
                let count = entries.filter_map(|e| e.ok()).count();
                CheckResult::ok_with_details(
                    "Workspace directory is readable",
                    format!("{} ({} entries)", root.display(), count),
                )
            }
            Err(e) => CheckResult::error_with_details(
                "Workspace directory is not readable",
                format!("{}: {}", root.display(), e),
            ),
        }
    }
}
