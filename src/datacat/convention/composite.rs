use super::{SegmentedPath, Template, WILDCARD};
use crate::error::{CatalogError, Result};
use crate::model::AttributeMap;
use std::path::{Path, PathBuf};

/// A full `root/dirs/filename` convention: a [`SegmentedPath`] for the directories
/// and a [`Template`] for the filename.
///
/// The root is fixed when the convention is configured ([`with_root`](Self::with_root))
/// and can be overridden per call (`*_in` methods); nothing here mutates after
/// construction, so one instance can serve any number of lookups.
#[derive(Debug, Clone)]
pub struct CompositeConvention {
    name: String,
    path: SegmentedPath,
    template: Template,
    root: PathBuf,
    date_fields: Vec<String>,
    unique_fields: Vec<String>,
}

impl CompositeConvention {
    pub fn new(name: impl Into<String>, path: SegmentedPath, template: Template) -> Self {
        Self {
            name: name.into(),
            path,
            template,
            root: PathBuf::new(),
            date_fields: Vec::new(),
            unique_fields: Vec::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Fields holding fixed-width dates. The first one is the start of the file's
    /// time range.
    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields expected to hold a single value across one coherent dataset.
    pub fn with_unique_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_convention(&self) -> &SegmentedPath {
        &self.path
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn date_fields(&self) -> &[String] {
        &self.date_fields
    }

    pub fn unique_fields(&self) -> &[String] {
        &self.unique_fields
    }

    /// Directory names followed by filename names not already seen.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .path
            .segment_names()
            .iter()
            .map(String::as_str)
            .collect();
        for name in self.template.pattern_names() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// The directory part, under the configured root.
    pub fn path(&self, values: &AttributeMap) -> PathBuf {
        self.path.format(values, &self.root)
    }

    pub fn filename(&self, values: &AttributeMap) -> String {
        self.template.format(values)
    }

    /// Full path under the configured root. Missing values become `*`, so this builds
    /// both search patterns and exact target paths.
    pub fn pattern(&self, values: &AttributeMap) -> PathBuf {
        self.pattern_in(values, &self.root, WILDCARD)
    }

    pub fn pattern_in(&self, values: &AttributeMap, root: &Path, wildcard: &str) -> PathBuf {
        self.path
            .format_with(values, root, wildcard)
            .join(self.template.format_with(values, wildcard))
    }

    pub fn parse(&self, path: &Path) -> Result<AttributeMap> {
        self.parse_in(path, &self.root)
    }

    /// Parses directories and filename and merges them. Filename values replace
    /// directory values of the same name.
    pub fn parse_in(&self, path: &Path, root: &Path) -> Result<AttributeMap> {
        let filename = path
            .file_name()
            .ok_or_else(|| CatalogError::PathShapeMismatch {
                path: path.to_path_buf(),
                reason: "has no filename".to_string(),
            })?
            .to_str()
            .ok_or_else(|| CatalogError::NonUtf8Path(path.to_path_buf()))?;
        let directory = path.parent().unwrap_or_else(|| Path::new(""));

        let mut attrs = self.path.parse(directory, root)?;
        attrs.extend(self.template.parse(filename)?);
        Ok(attrs)
    }
}
