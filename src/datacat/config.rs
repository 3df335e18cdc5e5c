use crate::convention::WILDCARD;
use crate::error::{CatalogError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Catalog settings, stored in `<config dir>/config.json`.
///
/// ```json
/// {
///   "roots": {
///     "CORDEX": "/mnt/lustre02/work/ik1017/C3SCORDEX/data/c3s-cordex",
///     "CMIP5": "/pool/data/CMIP5/cmip5"
///   },
///   "wildcard": "*"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Archive root per project identifier
    pub roots: BTreeMap<String, PathBuf>,

    /// Token for missing attributes in built paths. Discovery always globs with `*`.
    pub wildcard: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
            wildcard: WILDCARD.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CatalogConfig = serde_json::from_str(&content)?;
        if config.wildcard.is_empty() {
            return Err(CatalogError::Config(format!(
                "{}: wildcard must not be empty",
                config_path.display()
            )));
        }
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// The per-user directory holding `config.json`.
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "datacat", "datacat")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CatalogError::Config("could not determine config dir".to_string()))
    }

    pub fn root_for(&self, project_id: &str) -> Option<&Path> {
        self.roots.get(project_id).map(PathBuf::as_path)
    }

    pub fn set_root(&mut self, project_id: &str, root: impl Into<PathBuf>) {
        self.roots.insert(project_id.to_string(), root.into());
    }
}
