//! Repository root detection and path decomposition
//!
//! A workspace is laid out as `<root>/<source>/<owner>/<repo>`. A directory is
//! a repository root when it holds a `.git` directory; its identity is read
//! from the last three segments of its path beneath the workspace root.

use crate::catalog::Repository;
use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Directory that marks a repository root
pub const GIT_MARKER: &str = ".git";

/// Number of trailing path segments that identify a repository
const IDENTITY_SEGMENTS: usize = 3;

/// Check whether `path` is a directory directly containing a `.git` directory.
///
/// Missing paths and plain files are not repository roots; this never fails.
pub fn is_repository_root(path: &Path) -> bool {
    path.is_dir() && path.join(GIT_MARKER).is_dir()
}

/// Split a repository root into source, owner and repository name.
///
/// Only the part of `path` beneath `root` is considered, and of that only the
/// last three segments, so extra nesting between the root and the source is
/// ignored. Fewer than three segments is a [`Error::MalformedPath`].
pub fn decompose(root: &Path, path: &Path) -> Result<Repository> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::malformed_path(
            path,
            format!("not beneath the workspace root {}", root.display()),
        )
    })?;

    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let n = segments.len();
    if n < IDENTITY_SEGMENTS {
        return Err(Error::malformed_path(
            path,
            format!(
                "{} segment(s) beneath the workspace root, expected source/owner/repo",
                n
            ),
        ));
    }

    Ok(Repository::new(
        segments[n - 3].as_str(),
        segments[n - 2].as_str(),
        segments[n - 1].as_str(),
        path,
    ))
}
