//! Workspace walker - discovers repository roots and fills a [`Catalog`]
//!
//! The walk is a pre-order, depth-first traversal of the workspace root with
//! children visited in file-name order. Traversal itself knows nothing about
//! repositories: [`Walker::traverse`] hands each directory to a visitor which
//! answers with a [`WalkControl`]. [`Walker::walk`] supplies the visitor that
//! classifies directories, records repositories and prunes their subtrees.

use crate::catalog::Catalog;
use crate::classifier;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What the traversal should do after visiting a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Continue into the directory's children
    Descend,
    /// Do not visit anything beneath this directory
    SkipSubtree,
    /// End the traversal
    Stop,
}

/// Counters collected during a traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories handed to the visitor, root included
    pub directories_visited: usize,
    /// Entries the directory iterator failed to read
    pub errors: usize,
    /// Whether the visitor ended the walk early
    pub stopped: bool,
}

/// A repository root that could not be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a walk produced
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub catalog: Catalog,
    pub skipped: Vec<SkippedEntry>,
    pub excluded: usize,
    pub stats: WalkStats,
}

/// Depth-first workspace walker
pub struct Walker {
    follow_links: bool,
    max_depth: Option<usize>,
    max_repositories: Option<usize>,
    exclusions: Vec<Regex>,
}

impl Walker {
    /// Create a walker from scan settings.
    ///
    /// Exclusion patterns match whole directory names; `*` matches any run of
    /// characters.
    pub fn new(scan: &ScanConfig) -> Result<Self> {
        let exclusions = scan
            .exclude_patterns
            .iter()
            .map(|pattern| compile_exclusion(pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            follow_links: scan.follow_links,
            max_depth: scan.max_depth,
            max_repositories: scan.max_repositories,
            exclusions,
        })
    }

    /// Walk `root` and catalog every repository beneath it.
    ///
    /// Each repository root is recorded once and never descended into. A
    /// repository whose path is too short to decompose is logged, reported in
    /// [`WalkReport::skipped`] and still pruned.
    pub fn walk(&self, root: impl AsRef<Path>) -> Result<WalkReport> {
        let root = root.as_ref();
        let mut catalog = Catalog::new();
        let mut skipped = Vec::new();
        let mut excluded = 0;

        let stats = self.traverse(root, |dir, depth| {
            if self.limit_reached(&catalog) {
                return WalkControl::Stop;
            }

            if depth > 0 && self.is_excluded(dir) {
                debug!("Excluding directory: {}", dir.display());
                excluded += 1;
                return WalkControl::SkipSubtree;
            }

            if !classifier::is_repository_root(dir) {
                return WalkControl::Descend;
            }

            match classifier::decompose(root, dir) {
                Ok(repo) => {
                    debug!("Found repository: {}", repo.full_name());
                    catalog.add_repo(repo);
                }
                Err(e) => {
                    warn!("Skipping repository at {}: {}", dir.display(), e);
                    skipped.push(SkippedEntry {
                        path: dir.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }

            if self.limit_reached(&catalog) {
                WalkControl::Stop
            } else {
                WalkControl::SkipSubtree
            }
        })?;

        info!(
            "Found {} repositories under {} ({} directories visited)",
            catalog.len(),
            root.display(),
            stats.directories_visited
        );

        Ok(WalkReport {
            catalog,
            skipped,
            excluded,
            stats,
        })
    }

    /// Visit every directory beneath `root` in pre-order, letting `visit`
    /// steer the traversal.
    ///
    /// `visit` receives the directory path and its depth (0 for the root).
    /// Files are not visited. Unreadable entries are logged and counted, the
    /// walk continues past them. A missing root or one that is not a directory
    /// is a configuration error.
    pub fn traverse<F>(&self, root: &Path, mut visit: F) -> Result<WalkStats>
    where
        F: FnMut(&Path, usize) -> WalkControl,
    {
        check_root(root)?;

        let mut walk = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walk = walk.max_depth(depth);
        }

        let mut stats = WalkStats::default();
        let mut entries = walk.into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    stats.errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            stats.directories_visited += 1;

            match visit(entry.path(), entry.depth()) {
                WalkControl::Descend => {}
                WalkControl::SkipSubtree => entries.skip_current_dir(),
                WalkControl::Stop => {
                    debug!("Walk stopped at {}", entry.path().display());
                    stats.stopped = true;
                    break;
                }
            }
        }

        Ok(stats)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        let Some(name) = dir.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.exclusions.iter().any(|re| re.is_match(&name))
    }

    fn limit_reached(&self, catalog: &Catalog) -> bool {
        self.max_repositories
            .map_or(false, |max| catalog.len() >= max)
    }
}

/// Translate a simple glob (`*` wildcards only) into an anchored regex
fn compile_exclusion(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("^{}$", body)).map_err(|e| {
        Error::configuration(format!("invalid exclusion pattern {:?}: {}", pattern, e))
    })
}

fn check_root(root: &Path) -> Result<()> {
    if root.as_os_str().is_empty() {
        return Err(Error::configuration("workspace root is empty"));
    }
    if !root.exists() {
        return Err(Error::configuration(format!(
            "workspace root {} does not exist",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(Error::configuration(format!(
            "workspace root {} is not a directory",
            root.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn walker() -> Walker {
        Walker::new(&ScanConfig::default()).unwrap()
    }

    fn mkrepo(root: &Path, rel: &str) -> PathBuf {
        let dir = root.join(rel);
        fs::create_dir_all(dir.join(".git")).unwrap();
        dir
    }

    #[test]
    fn test_empty_root_string_is_configuration_error() {
        assert_matches!(walker().walk(""), Err(Error::Configuration { .. }));
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        let result = walker().walk("/nonexistent/gpm/workspace");
        assert_matches!(result, Err(Error::Configuration { message }) => {
            assert!(message.contains("does not exist"));
        });
    }

    #[test]
    fn test_file_root_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        assert_matches!(walker().walk(&file), Err(Error::Configuration { .. }));
    }

    #[test]
    fn test_empty_workspace_yields_empty_catalog() {
        let temp = TempDir::new().unwrap();
        let report = walker().walk(temp.path()).unwrap();

        assert!(report.catalog.is_empty());
        assert!(report.catalog.sources().is_empty());
        assert!(report.catalog.owners().is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.stats.directories_visited, 1);
    }

    #[test]
    fn test_traverse_visits_in_preorder_by_name() {
        let temp = TempDir::new().unwrap();
        for dir in ["b/x", "a/y", "a/x"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("a/file.txt"), "files are not visited").unwrap();

        let mut seen = Vec::new();
        walker()
            .traverse(temp.path(), |dir, depth| {
                let rel = dir.strip_prefix(temp.path()).unwrap().to_string_lossy().into_owned();
                seen.push((rel, depth));
                WalkControl::Descend
            })
            .unwrap();

        let expected: Vec<(String, usize)> = vec![
            ("".into(), 0),
            ("a".into(), 1),
            ("a/x".into(), 2),
            ("a/y".into(), 2),
            ("b".into(), 1),
            ("b/x".into(), 2),
        ];
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_skip_subtree_prunes_descendants() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/deep/deeper")).unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();

        let mut seen = Vec::new();
        walker()
            .traverse(temp.path(), |dir, _| {
                seen.push(dir.to_path_buf());
                if dir.ends_with("a") {
                    WalkControl::SkipSubtree
                } else {
                    WalkControl::Descend
                }
            })
            .unwrap();

        assert!(seen.contains(&temp.path().join("a")));
        assert!(seen.contains(&temp.path().join("b")));
        assert!(!seen.iter().any(|p| p.starts_with(temp.path().join("a/deep"))));
    }

    #[test]
    fn test_stop_ends_traversal() {
        let temp = TempDir::new().unwrap();
        for dir in ["a", "b", "c"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }

        let mut seen = 0;
        let stats = walker()
            .traverse(temp.path(), |dir, _| {
                seen += 1;
                if dir.ends_with("a") {
                    WalkControl::Stop
                } else {
                    WalkControl::Descend
                }
            })
            .unwrap();

        assert_eq!(seen, 2);
        assert!(stats.stopped);
        assert_eq!(stats.directories_visited, 2);
    }

    #[test]
    fn test_walk_prunes_nested_repositories() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/alice/proj1");
        mkrepo(temp.path(), "github.com/alice/proj1/vendor/lib");

        let report = walker().walk(temp.path()).unwrap();

        let names: Vec<_> = report.catalog.repositories().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["proj1"]);
    }

    #[test]
    fn test_repository_at_root_is_skipped_not_descended() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        mkrepo(temp.path(), "github.com/alice/proj1");

        let report = walker().walk(temp.path()).unwrap();

        assert!(report.catalog.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, temp.path());
        assert_eq!(report.stats.directories_visited, 1);
    }

    #[test]
    fn test_shallow_repository_is_skipped_and_walk_continues() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/stray");
        mkrepo(temp.path(), "gitlab.com/bob/proj2");

        let report = walker().walk(temp.path()).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("github.com/stray"));
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.repositories()[0].full_name(), "gitlab.com/bob/proj2");
    }

    #[test]
    fn test_exclusion_patterns_skip_directories() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/alice/proj1");
        mkrepo(temp.path(), "node_modules/npm/left-pad");
        mkrepo(temp.path(), "archive.old/carol/proj3");

        let scan = ScanConfig {
            exclude_patterns: vec!["node_modules".to_string(), "*.old".to_string()],
            ..ScanConfig::default()
        };
        let report = Walker::new(&scan).unwrap().walk(temp.path()).unwrap();

        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.excluded, 2);
    }

    #[test]
    fn test_exclusion_does_not_apply_to_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("node_modules");
        mkrepo(&root, "github.com/alice/proj1");

        let report = walker().walk(&root).unwrap();
        assert_eq!(report.catalog.len(), 1);
    }

    #[test]
    fn test_exclusion_pattern_escapes_regex_characters() {
        let re = compile_exclusion("a+b.*").unwrap();

        assert!(re.is_match("a+b.tmp"));
        assert!(!re.is_match("aab.tmp"));
        assert!(!re.is_match("xa+b.tmp"));
    }

    #[test]
    fn test_max_repositories_stops_walk() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/alice/a");
        mkrepo(temp.path(), "github.com/alice/b");
        mkrepo(temp.path(), "github.com/alice/c");

        let scan = ScanConfig {
            max_repositories: Some(2),
            ..ScanConfig::default()
        };
        let report = Walker::new(&scan).unwrap().walk(temp.path()).unwrap();

        let names: Vec<_> = report.catalog.repositories().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(report.stats.stopped);
    }

    #[test]
    fn test_max_depth_limits_discovery() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/alice/proj1");
        mkrepo(temp.path(), "nested/github.com/bob/proj2");

        let scan = ScanConfig {
            max_depth: Some(3),
            ..ScanConfig::default()
        };
        let report = Walker::new(&scan).unwrap().walk(temp.path()).unwrap();

        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.repositories()[0].name, "proj1");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed_by_default() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        mkrepo(outside.path(), "github.com/eve/linked");
        fs::create_dir_all(temp.path().join("mirror")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("github.com"), temp.path().join("mirror/github.com")).unwrap();

        let report = walker().walk(temp.path()).unwrap();
        assert!(report.catalog.is_empty());

        let scan = ScanConfig {
            follow_links: true,
            ..ScanConfig::default()
        };
        let report = Walker::new(&scan).unwrap().walk(temp.path()).unwrap();
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.repositories()[0].full_name(), "github.com/eve/linked");
    }

    #[cfg(unix)]
    #[test]
    fn test_link_cycle_is_counted_and_walk_continues() {
        let temp = TempDir::new().unwrap();
        mkrepo(temp.path(), "github.com/alice/proj1");
        fs::create_dir_all(temp.path().join("a")).unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("a/loop")).unwrap();

        let scan = ScanConfig {
            follow_links: true,
            ..ScanConfig::default()
        };
        let report = Walker::new(&scan).unwrap().walk(temp.path()).unwrap();

        assert_eq!(report.stats.errors, 1);
        assert!(!report.stats.stopped);
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.repositories()[0].full_name(), "github.com/alice/proj1");
    }
}
