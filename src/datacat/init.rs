use crate::api::CatalogApi;
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::source::fs::GlobSource;
use std::path::{Path, PathBuf};

pub struct CatalogContext {
    pub api: CatalogApi<GlobSource>,
    pub config_dir: PathBuf,
}

/// Wires a filesystem-backed API from the config in `config_dir`, or from the
/// per-user config directory when none is given. A missing config file means
/// defaults; a malformed one is an error.
pub fn initialize(config_dir: Option<&Path>) -> Result<CatalogContext> {
    let config_dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => CatalogConfig::default_dir()?,
    };
    let config = CatalogConfig::load(&config_dir)?;
    tracing::debug!(
        config_dir = %config_dir.display(),
        roots = config.roots.len(),
        "catalog initialized"
    );

    Ok(CatalogContext {
        api: CatalogApi::new(GlobSource::new(), config),
        config_dir,
    })
}
