use super::{Entry, FileSource};
use crate::error::Result;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Directory,
}

/// In-memory listing of paths.
///
/// Adding a file also creates all of its parent directories.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<PathBuf, Kind>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_dir(path);
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_parents(&path);
        self.entries.insert(path, Kind::File);
    }

    pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_parents(&path);
        self.entries.insert(path, Kind::Directory);
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|k| **k == Kind::File).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add_parents(&mut self, path: &Path) {
        for parent in path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.entries
                .entry(parent.to_path_buf())
                .or_insert(Kind::Directory);
        }
    }

    fn entry(path: &Path, kind: Kind) -> Entry {
        match kind {
            Kind::File => Entry::File(path.to_path_buf()),
            Kind::Directory => Entry::Directory(path.to_path_buf()),
        }
    }
}

impl FileSource for MemorySource {
    fn expand(&self, pattern: &str) -> Result<Vec<Entry>> {
        let pattern = Pattern::new(pattern)?;
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        Ok(self
            .entries
            .iter()
            .filter(|(path, _)| pattern.matches_path_with(path, options))
            .map(|(path, kind)| Self::entry(path, *kind))
            .collect())
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        match self.entries.get(dir) {
            Some(Kind::Directory) => {}
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no directory {}", dir.display()),
                )
                .into())
            }
        }

        Ok(self
            .entries
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, kind)| Self::entry(path, *kind))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_file("/data/a/x.nc")
            .with_file("/data/a/b/y.nc")
            .with_dir("/data/c/d.nc")
    }

    #[test]
    fn test_parents_are_implied() {
        let entries = source().expand("/data/*").unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::Directory(PathBuf::from("/data/a")),
                Entry::Directory(PathBuf::from("/data/c")),
            ]
        );
        assert_eq!(source().len(), 2);
    }

    #[test]
    fn test_wildcards_stay_within_one_segment() {
        let entries = source().expand("/data/*/*.nc").unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::File(PathBuf::from("/data/a/x.nc")),
                Entry::Directory(PathBuf::from("/data/c/d.nc")),
            ]
        );
    }

    #[test]
    fn test_lists_immediate_children() {
        let entries = source().list(Path::new("/data/a")).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::Directory(PathBuf::from("/data/a/b")),
                Entry::File(PathBuf::from("/data/a/x.nc")),
            ]
        );
        assert!(source().list(Path::new("/data/a/x.nc")).is_err());
        assert!(source().list(Path::new("/nowhere")).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(MemorySource::new().expand("/data/[a").is_err());
    }
}
