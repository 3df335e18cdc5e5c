//! # Discovery
//!
//! Turns a convention and a partial filter into a [`Selection`]:
//!
//! 1. build the search pattern with the convention, filling unfiltered attributes
//!    with the wildcard
//! 2. expand the directory part of the pattern through a [`FileSource`], then list
//!    every matched directory
//! 3. parse each listed file whose name matches the filename part of the pattern
//! 4. collect the parsed files into a selection
//!
//! Listed files whose names do not match the filename pattern are simply not part of
//! the search. Anything else that cannot become a row is skipped: directories below
//! the deepest convention level, unreadable entries, and files whose path does not
//! have the convention's shape. Skips are logged and recorded in [`Discovery::skipped`];
//! one bad entry never sinks the run. Only an invalid search pattern fails the call.

use crate::convention::{CompositeConvention, WILDCARD};
use crate::error::{CatalogError, Result};
use crate::model::{AttributeMap, FileRecord};
use crate::selection::Selection;
use crate::source::{Entry, FileSource};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-call discovery settings.
///
/// Unfiltered attributes always become the glob wildcard `*`; a custom token would
/// turn into literal text in the search pattern.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Overrides the convention's own root for this call
    pub root: Option<PathBuf>,
    /// Attribute values the files must have; everything else is a wildcard
    pub filter: AttributeMap,
}

impl DiscoveryOptions {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_filter(mut self, filter: AttributeMap) -> Self {
        self.filter = filter;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A directory (or special file) where data files are expected
    NotAFile,
    /// A file where a convention directory level is expected
    NotADirectory,
    Unreadable(String),
    /// The path or filename does not follow the convention
    Shape(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one discovery run.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Full search pattern, directories and filename
    pub pattern: PathBuf,
    pub selection: Selection,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Default)]
struct Collector {
    records: Vec<FileRecord>,
    skipped: Vec<SkippedEntry>,
}

impl Collector {
    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        warn!(path = %path.display(), reason = ?reason, "skipping entry");
        self.skipped.push(SkippedEntry { path, reason });
    }
}

pub fn discover<S: FileSource>(
    source: &S,
    convention: &CompositeConvention,
    options: &DiscoveryOptions,
) -> Result<Discovery> {
    let root = options
        .root
        .clone()
        .unwrap_or_else(|| convention.root().to_path_buf());

    // The root is taken literally; only the convention part may contain wildcards.
    let root_str = root
        .to_str()
        .ok_or_else(|| CatalogError::NonUtf8Path(root.clone()))?;
    let escaped_root = PathBuf::from(Pattern::escape(root_str));

    let dir_pattern = convention
        .path_convention()
        .format_with(&options.filter, &escaped_root, WILDCARD);
    let dir_pattern = utf8(&dir_pattern)?;
    let file_pattern = convention
        .template()
        .format_with(&options.filter, WILDCARD);
    let file_matcher = Pattern::new(&file_pattern)?;
    let pattern = Path::new(dir_pattern).join(&file_pattern);
    debug!(
        convention = convention.name(),
        pattern = %pattern.display(),
        "expanding search pattern"
    );

    let mut found = Collector::default();
    for entry in source.expand(dir_pattern)? {
        match entry {
            Entry::Directory(dir) => match source.list(&dir) {
                Ok(children) => {
                    for child in children {
                        collect_child(child, convention, &root, &file_matcher, &mut found);
                    }
                }
                Err(e) => found.skip(dir, SkipReason::Unreadable(e.to_string())),
            },
            Entry::File(path) | Entry::Other(path) => found.skip(path, SkipReason::NotADirectory),
            Entry::Unreadable { path, reason } => found.skip(path, SkipReason::Unreadable(reason)),
        }
    }

    info!(
        convention = convention.name(),
        files = found.records.len(),
        skipped = found.skipped.len(),
        "discovery finished"
    );

    let selection = Selection::new(found.records)
        .with_date_fields(convention.date_fields().iter().cloned())
        .with_unique_fields(convention.unique_fields().iter().cloned());

    Ok(Discovery {
        pattern,
        selection,
        skipped: found.skipped,
    })
}

fn collect_child(
    child: Entry,
    convention: &CompositeConvention,
    root: &Path,
    file_matcher: &Pattern,
    found: &mut Collector,
) {
    match child {
        Entry::File(path) => {
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| file_matcher.matches(name));
            if !matches {
                debug!(path = %path.display(), "not part of the search");
                return;
            }
            match convention.parse_in(&path, root) {
                Ok(attributes) => found.records.push(FileRecord::new(path, attributes)),
                Err(e) => found.skip(path, SkipReason::Shape(e.to_string())),
            }
        }
        Entry::Directory(path) | Entry::Other(path) => found.skip(path, SkipReason::NotAFile),
        Entry::Unreadable { path, reason } => found.skip(path, SkipReason::Unreadable(reason)),
    }
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| CatalogError::NonUtf8Path(path.to_path_buf()))
}
