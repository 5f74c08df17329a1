//! Error types for workspace scanning
//!
//! Classification never fails: a path that is missing or is not a directory is
//! simply not a repository. The errors here cover the two cases a caller has
//! to know about, an unusable workspace root and a repository whose path does
//! not fit the `source/owner/repo` layout.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gpm operations
#[derive(Error, Debug)]
pub enum Error {
    /// The workspace root (or another scan setting) cannot be used.
    ///
    /// Raised before traversal starts, so the caller never receives a
    /// silently empty catalog for a misconfigured root.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A repository root whose path cannot be split into source, owner and
    /// repository name.
    #[error("Malformed repository path {}: {reason}", path.display())]
    MalformedPath { path: PathBuf, reason: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for gpm operations
pub type Result<T> = std::result::Result<T, Error>;
