//! # File Sources
//!
//! Discovery never touches the filesystem directly. It asks a [`FileSource`] to expand
//! the directory part of a search pattern and then to list each matched directory.
//!
//! ## Implementations
//!
//! - [`fs::GlobSource`]: the real filesystem, through `glob` and `read_dir`
//! - [`memory::MemorySource`]: a fixed set of paths held in memory, for tests and
//!   for cataloging listings obtained elsewhere (an index file, a remote listing)
//!
//! ## Pattern Syntax
//!
//! Both sources use `glob` semantics: `*` and `?` never cross a path separator, so a
//! wildcard in one segment of a convention only ever matches that segment.
//!
//! Expansion is eager and single pass. A huge tree is walked completely before
//! discovery starts parsing.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

/// One path seen while expanding or listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(PathBuf),
    Directory(PathBuf),
    /// Neither a regular file nor a directory (sockets, broken links, ...)
    Other(PathBuf),
    /// The source failed while looking at this path
    Unreadable { path: PathBuf, reason: String },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File(path) | Entry::Directory(path) | Entry::Other(path) => path,
            Entry::Unreadable { path, .. } => path,
        }
    }
}

pub trait FileSource {
    /// Every entry matching `pattern`, sorted by path.
    ///
    /// Fails only when the pattern itself is invalid; problems with individual
    /// entries are reported as [`Entry::Unreadable`].
    fn expand(&self, pattern: &str) -> Result<Vec<Entry>>;

    /// Immediate children of `dir`, sorted by path.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
}
