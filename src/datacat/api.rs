//! # API Facade
//!
//! [`CatalogApi`] is the single entry point for catalog operations. It is a thin layer:
//!
//! - **Resolves** a project identifier to a fresh convention through the registry
//! - **Applies** the configured root, and the configured wildcard when building paths
//! - **Dispatches** to [`discovery`](crate::discovery) or to the convention itself
//!
//! It does no printing and keeps no state between calls: every operation builds its
//! own convention instance, so a root set for one call never leaks into another.
//!
//! ## Generic Over FileSource
//!
//! `CatalogApi<S: FileSource>` is generic over where files come from:
//! - Production: `CatalogApi<GlobSource>`
//! - Testing: `CatalogApi<MemorySource>`
//!
//! API tests check dispatch and argument handling. Matching rules are tested in the
//! convention modules, traversal in [`discovery`](crate::discovery).

use crate::config::CatalogConfig;
use crate::convention::CompositeConvention;
use crate::discovery::{discover, Discovery, DiscoveryOptions};
use crate::error::Result;
use crate::model::{AttributeMap, FileRecord};
use crate::registry::ConventionRegistry;
use crate::selection::Selection;
use crate::source::FileSource;
use std::path::{Path, PathBuf};

pub struct CatalogApi<S: FileSource> {
    source: S,
    registry: ConventionRegistry,
    config: CatalogConfig,
}

impl<S: FileSource> CatalogApi<S> {
    /// An API over the built-in conventions.
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self {
            source,
            registry: ConventionRegistry::builtin().clone(),
            config,
        }
    }

    pub fn with_registry(mut self, registry: ConventionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Known project identifiers.
    pub fn conventions(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// A new convention for `project_id`, rooted at the configured root if any.
    pub fn convention(&self, project_id: &str) -> Result<CompositeConvention> {
        let convention = self.registry.get(project_id)?;
        Ok(match self.config.root_for(project_id) {
            Some(root) => convention.with_root(root),
            None => convention,
        })
    }

    /// Finds the files of `project_id` matching `filter` under the configured root.
    pub fn select(&self, project_id: &str, filter: AttributeMap) -> Result<Selection> {
        let options = DiscoveryOptions::default().with_filter(filter);
        Ok(self.discover(project_id, &options)?.selection)
    }

    /// Like [`select`](Self::select), under `root` instead of the configured root.
    pub fn select_in(
        &self,
        project_id: &str,
        root: impl Into<PathBuf>,
        filter: AttributeMap,
    ) -> Result<Selection> {
        let options = DiscoveryOptions::default()
            .with_root(root)
            .with_filter(filter);
        Ok(self.discover(project_id, &options)?.selection)
    }

    /// Full discovery outcome, including the entries that were skipped.
    pub fn discover(&self, project_id: &str, options: &DiscoveryOptions) -> Result<Discovery> {
        let convention = self.convention(project_id)?;
        discover(&self.source, &convention, options)
    }

    /// Parses one known file. Unlike discovery, a nonconforming path is an error.
    pub fn parse_file(&self, project_id: &str, path: &Path) -> Result<FileRecord> {
        let convention = self.convention(project_id)?;
        let attributes = convention.parse(path)?;
        Ok(FileRecord::new(path.to_path_buf(), attributes))
    }

    /// Where a file with `attrs` lives; missing attributes become the configured
    /// wildcard token. Discovery always searches with `*`, whatever the token.
    pub fn build_path(&self, project_id: &str, attrs: &AttributeMap) -> Result<PathBuf> {
        let convention = self.convention(project_id)?;
        Ok(convention.pattern_in(attrs, convention.root(), &self.config.wildcard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::model::attribute_map;
    use crate::source::memory::MemorySource;

    const CMIP5_ROOT: &str = "/pool/data/CMIP5/cmip5";
    const VAS: &str = "/pool/data/CMIP5/cmip5/output1/MPI-M/MPI-ESM-LR/historical/day/atmos/day/r1i1p1/v20111006/vas/vas_day_MPI-ESM-LR_historical_r1i1p1_19500101-19591231.nc";
    const TAS: &str = "/pool/data/CMIP5/cmip5/output1/MPI-M/MPI-ESM-LR/historical/day/atmos/day/r1i1p1/v20111006/tas/tas_day_MPI-ESM-LR_historical_r1i1p1_19500101-19591231.nc";

    fn api() -> CatalogApi<MemorySource> {
        let mut config = CatalogConfig::default();
        config.set_root("CMIP5", CMIP5_ROOT);
        CatalogApi::new(MemorySource::new().with_file(VAS).with_file(TAS), config)
    }

    #[test]
    fn test_lists_conventions() {
        assert_eq!(api().conventions(), ["CORDEX", "CMIP5"]);
    }

    #[test]
    fn test_convention_uses_configured_root() {
        let api = api();
        assert_eq!(api.convention("CMIP5").unwrap().root(), Path::new(CMIP5_ROOT));
        assert_eq!(api.convention("CORDEX").unwrap().root(), Path::new(""));
    }

    #[test]
    fn test_unknown_project_is_an_error() {
        assert!(matches!(
            api().select("cmip5", AttributeMap::new()),
            Err(CatalogError::UnknownConvention { .. })
        ));
    }

    #[test]
    fn test_select_with_filter() {
        let api = api();
        assert_eq!(api.select("CMIP5", AttributeMap::new()).unwrap().len(), 2);

        let selection = api
            .select("CMIP5", attribute_map([("variable", "tas")]))
            .unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.paths().next(), Some(Path::new(TAS)));
        assert!(selection.is_coherent());
    }

    #[test]
    fn test_select_in_overrides_root() {
        let api = api();
        let selection = api
            .select_in("CMIP5", "/pool/data/CMIP5", AttributeMap::new())
            .unwrap();
        assert!(selection.is_empty());

        let found = api
            .discover(
                "CMIP5",
                &DiscoveryOptions::default().with_root("/pool/data/CMIP5"),
            )
            .unwrap();
        // one level too shallow: the variable directories show up where files belong
        assert!(found.selection.is_empty());
        assert_eq!(found.skipped.len(), 2);
    }

    #[test]
    fn test_parse_file_is_strict() {
        let api = api();
        let record = api.parse_file("CMIP5", Path::new(VAS)).unwrap();
        assert_eq!(record.text("variable"), Some("vas"));
        assert_eq!(record.text("institute_id"), Some("MPI-M"));

        let err = api
            .parse_file("CMIP5", Path::new("/pool/data/CMIP5/cmip5/output1/vas.nc"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::PathShapeMismatch { .. }));
    }

    #[test]
    fn test_build_path_round_trips() {
        let api = api();
        let record = api.parse_file("CMIP5", Path::new(VAS)).unwrap();
        let attrs: AttributeMap = record
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.as_text().to_string()))
            .collect();
        assert_eq!(api.build_path("CMIP5", &attrs).unwrap(), PathBuf::from(VAS));
    }

    #[test]
    fn test_build_path_uses_configured_wildcard() {
        let mut config = CatalogConfig::default();
        config.wildcard = "?".to_string();
        let api = CatalogApi::new(MemorySource::new(), config);
        let path = api
            .build_path("CMIP5", &attribute_map([("variable", "pr")]))
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("?/?/?/?/?/?/?/?/?/pr/pr_?_?_?_?_?-?.nc")
        );
    }

    #[test]
    fn test_select_ignores_a_non_glob_wildcard() {
        let mut config = CatalogConfig::default();
        config.set_root("CMIP5", CMIP5_ROOT);
        config.wildcard = "MISSING".to_string();
        let api = CatalogApi::new(MemorySource::new().with_file(VAS).with_file(TAS), config);

        assert_eq!(api.select("CMIP5", AttributeMap::new()).unwrap().len(), 2);
        let vas = api
            .select("CMIP5", attribute_map([("variable", "vas")]))
            .unwrap();
        assert_eq!(vas.paths().next(), Some(Path::new(VAS)));

        let target = api
            .build_path("CMIP5", &attribute_map([("variable", "vas")]))
            .unwrap();
        assert!(target.starts_with(Path::new(CMIP5_ROOT).join("MISSING")));
    }
}
