use super::{Entry, FileSource};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-backed source.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobSource;

impl GlobSource {
    pub fn new() -> Self {
        Self
    }
}

/// Classifies a path, following symlinks.
fn classify(path: PathBuf) -> Entry {
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Entry::File(path),
        Ok(meta) if meta.is_dir() => Entry::Directory(path),
        Ok(_) => Entry::Other(path),
        Err(e) => Entry::Unreadable {
            path,
            reason: e.to_string(),
        },
    }
}

impl FileSource for GlobSource {
    fn expand(&self, pattern: &str) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for matched in glob::glob(pattern)? {
            entries.push(match matched {
                Ok(path) => classify(path),
                Err(e) => Entry::Unreadable {
                    path: e.path().to_path_buf(),
                    reason: e.error().to_string(),
                },
            });
        }
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(entries)
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for child in fs::read_dir(dir)? {
            entries.push(match child {
                Ok(child) => classify(child.path()),
                Err(e) => Entry::Unreadable {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                },
            });
        }
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(entries)
    }
}
