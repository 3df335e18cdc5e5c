use super::WILDCARD;
use crate::error::{CatalogError, Result};
use crate::model::AttributeMap;
use std::path::{Component, Path, PathBuf};

/// A directory hierarchy in which every level holds exactly one attribute.
///
/// `["model", "domain", "variable"]` describes `<root>/REMO2015/EUR-11/pr`.
/// Unlike [`Template`](super::Template) there are no defaults here: a segment is
/// either given or replaced by the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedPath {
    segments: Vec<String>,
}

impl SegmentedPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Attribute names from the shallowest directory to the deepest.
    pub fn segment_names(&self) -> &[String] {
        &self.segments
    }

    /// The hierarchy as a relative path of names, e.g. `model/domain/variable`.
    pub fn layout(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    pub fn format_with(&self, values: &AttributeMap, root: &Path, wildcard: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        for name in &self.segments {
            path.push(values.get(name).map(String::as_str).unwrap_or(wildcard));
        }
        path
    }

    pub fn format(&self, values: &AttributeMap, root: &Path) -> PathBuf {
        self.format_with(values, root, WILDCARD)
    }

    /// Zips the segments of `path` below `root` with the declared names.
    ///
    /// The number of segments must match the number of names exactly; anything else
    /// (including a path outside `root` or one that climbs with `..`) is a
    /// [`CatalogError::PathShapeMismatch`].
    pub fn parse(&self, path: &Path, root: &Path) -> Result<AttributeMap> {
        let mismatch = |reason: String| CatalogError::PathShapeMismatch {
            path: path.to_path_buf(),
            reason,
        };

        let relative = path
            .strip_prefix(root)
            .map_err(|_| mismatch(format!("is not below root '{}'", root.display())))?;

        let mut values = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment
                        .to_str()
                        .ok_or_else(|| mismatch("contains a non UTF-8 segment".to_string()))?;
                    values.push(segment.to_string());
                }
                Component::CurDir => {}
                _ => {
                    return Err(mismatch(format!(
                        "has a non-plain segment '{}' below the root",
                        component.as_os_str().to_string_lossy()
                    )))
                }
            }
        }

        if values.len() != self.segments.len() {
            return Err(mismatch(format!(
                "has {} segments below the root, expected {} ({})",
                values.len(),
                self.segments.len(),
                self.layout().display()
            )));
        }

        Ok(self.segments.iter().cloned().zip(values).collect())
    }
}
