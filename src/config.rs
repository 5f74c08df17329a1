use anyhow::{Context, Result};
use dirs::config_dir;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Main configuration structure for gpm
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Workspace root holding `source/owner/repo` directories
    #[serde(default = "default_workspace_root")]
    pub workspace_root: String,

    /// Traversal settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Workspace traversal configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_links: bool,

    /// Maximum depth below the workspace root
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Stop walking once this many repositories were found
    #[serde(default)]
    pub max_repositories: Option<usize>,

    /// Directory names never descended into
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "warn"

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_workspace_root() -> String {
    "${GOPATH}/src".to_string()
}
fn default_exclude_patterns() -> Vec<String> {
    vec!["node_modules".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

// Default implementations
impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
            max_repositories: None,
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("gpm").join("config.yml"))
    }

    /// Resolve the workspace root to walk.
    ///
    /// `override_root` (from the command line) wins over `workspace_root`.
    /// Environment variables and `~` are expanded; an empty result or an
    /// unset variable is a configuration error rather than an empty scan.
    pub fn workspace_root(&self, override_root: Option<&str>) -> crate::Result<PathBuf> {
        let raw = override_root.unwrap_or(&self.workspace_root);
        expand_root(raw)
    }
}

/// Expand and normalize a workspace root string
pub fn expand_root(raw: &str) -> crate::Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(Error::configuration("workspace root is empty"));
    }

    let expanded = shellexpand::full(raw).map_err(|e| {
        Error::configuration(format!("cannot expand workspace root {:?}: {}", raw, e))
    })?;

    if expanded.trim().is_empty() {
        return Err(Error::configuration(format!(
            "workspace root {:?} expands to an empty path",
            raw
        )));
    }

    Ok(PathBuf::from(expanded.as_ref()).clean())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            scan: ScanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
