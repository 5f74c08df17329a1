//! In-memory index of discovered repositories
//!
//! The catalog keeps three views of a workspace scan:
//!
//! - the distinct hosting **sources** (`github.com`, `gitlab.com`, ...)
//! - the distinct **owners**, keyed by `(owner, source)` so that `alice` on two
//!   different hosts stays two entries
//! - every **repository** in the order it was discovered
//!
//! Entries are only ever added. Sources and owners are inserted if absent;
//! repositories are appended unconditionally.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A hosting root, e.g. a code-hosting domain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Source {
    pub name: String,
}

/// An organization or user namespace within one source
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Owner {
    pub name: String,
    pub source: String,
}

/// A single discovered git project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Repository name (last path segment)
    pub name: String,

    /// Owner/organization name
    pub owner: String,

    /// Hosting source name
    pub source: String,

    /// Directory the repository was found at
    pub path: PathBuf,
}

impl Repository {
    pub fn new(
        source: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            source: source.into(),
            path: path.into(),
        }
    }

    /// Get display name (source/owner/name format)
    pub fn full_name(&self) -> String {
        format!("{}/{}/{}", self.source, self.owner, self.name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Optional source/owner restriction for repository queries
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    pub source: Option<String>,
    pub owner: Option<String>,
}

impl RepoFilter {
    pub fn matches(&self, repo: &Repository) -> bool {
        self.source.as_deref().map_or(true, |s| s == repo.source)
            && self.owner.as_deref().map_or(true, |o| o == repo.owner)
    }
}

/// Longest names seen so far, for column alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    pub source: usize,
    pub owner: usize,
    pub repo: usize,
}

impl ColumnWidths {
    fn record(&mut self, repo: &Repository) {
        self.source = self.source.max(repo.source.chars().count());
        self.owner = self.owner.max(repo.owner.chars().count());
        self.repo = self.repo.max(repo.name.chars().count());
    }
}

/// Deduplicated sources and owners plus the ordered repository list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sources: BTreeSet<Source>,
    owners: BTreeSet<Owner>,
    repositories: Vec<Repository>,
    widths: ColumnWidths,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a repository and make sure its source and owner are indexed
    pub fn add_repo(&mut self, repo: Repository) {
        self.sources.insert(Source {
            name: repo.source.clone(),
        });
        self.owners.insert(Owner {
            name: repo.owner.clone(),
            source: repo.source.clone(),
        });
        self.widths.record(&repo);
        self.repositories.push(repo);
    }

    /// All distinct source names
    pub fn sources(&self) -> BTreeSet<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    /// All distinct owner names.
    ///
    /// Owners are stored per source but only the name is projected here, so
    /// the same owner under two sources shows up once.
    pub fn owners(&self) -> BTreeSet<&str> {
        self.owners.iter().map(|o| o.name.as_str()).collect()
    }

    /// Owner names registered under one source
    pub fn owners_of(&self, source: &str) -> BTreeSet<&str> {
        self.owners
            .iter()
            .filter(|o| o.source == source)
            .map(|o| o.name.as_str())
            .collect()
    }

    /// Every repository in discovery order
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Repositories matching `filter`, in discovery order
    pub fn filter<'a>(&'a self, filter: &'a RepoFilter) -> impl Iterator<Item = &'a Repository> + 'a {
        self.repositories.iter().filter(move |r| filter.matches(r))
    }

    pub fn widths(&self) -> ColumnWidths {
        self.widths
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
