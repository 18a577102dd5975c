use std::path::{Path, PathBuf};

/// Overrides the index directory.
pub const INDEX_DIR_ENV: &str = "INDEX_DIR_PATH";
/// Overrides the catalog database location.
pub const CATALOG_PATH_ENV: &str = "CATALOG_PATH";
/// Index directory used when `INDEX_DIR_PATH` is unset, relative to the working directory.
pub const DEFAULT_INDEX_DIR: &str = "_index_data";

const CATALOG_DIR_NAME: &str = "_catalog";

/// Where the engine keeps its postings files and its document catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub index_dir: PathBuf,
    pub catalog_path: PathBuf,
}

impl EngineConfig {
    /// Catalog lives next to the postings files. Terms are purely
    /// alphanumeric so the `_catalog` name never collides with a term file.
    pub fn with_index_dir<P: AsRef<Path>>(index_dir: P) -> Self {
        let index_dir = index_dir.as_ref().to_path_buf();
        let catalog_path = index_dir.join(CATALOG_DIR_NAME);
        Self { index_dir, catalog_path }
    }

    pub fn from_env() -> Self {
        Self::resolve(
            std::env::var_os(INDEX_DIR_ENV).map(PathBuf::from),
            std::env::var_os(CATALOG_PATH_ENV).map(PathBuf::from),
        )
    }

    fn resolve(index_dir: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Self {
        let mut config = Self::with_index_dir(index_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_DIR)));
        if let Some(path) = catalog_path {
            config.catalog_path = path;
        }
        config
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_index_dir(DEFAULT_INDEX_DIR)
    }
}
