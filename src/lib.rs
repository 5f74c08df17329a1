//! gpm - catalog the git projects living under a workspace root
//!
//! A workspace is laid out as `<root>/<source>/<owner>/<repo>`, the way
//! `$GOPATH/src` is. gpm walks it once, finds every git repository, and
//! indexes them by hosting source and owner so they can be listed and
//! filtered without walking the tree by hand.
//!
//! ## Modules
//!
//! - [`classifier`]: repository root detection and path decomposition
//! - [`catalog`]: deduplicated source/owner indexes and the repository list
//! - [`walker`]: depth-first traversal with subtree pruning
//! - [`config`]: YAML configuration and workspace root resolution
//! - [`health`]: diagnostics behind `gpm doctor`

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod health;
pub mod walker;

pub use catalog::{Catalog, ColumnWidths, Owner, RepoFilter, Repository, Source};
pub use config::Config;
pub use error::{Error, Result};
pub use health::HealthCheck;
pub use walker::{WalkControl, WalkReport, Walker};
