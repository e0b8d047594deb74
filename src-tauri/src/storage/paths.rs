use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{MarketError, MarketResult};

/// Manages filesystem paths used by the market client backend.
#[derive(Debug, Clone)]
pub struct MarketPaths {
    /// Root directory for client data.
    root_dir: PathBuf,
    /// Directory for cache/state data (e.g., last listing pages).
    cache_dir: PathBuf,
    /// Path to persisted client configuration.
    config_file: PathBuf,
}

impl MarketPaths {
    /// Create a new path manager rooted at the provided directory.
    pub fn new(root: impl AsRef<Path>) -> MarketResult<Self> {
        let root_dir = root.as_ref().to_path_buf();
        if root_dir.as_os_str().is_empty() {
            return Err(MarketError::StorageError(
                "Client root directory cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            cache_dir: root_dir.join("cache"),
            config_file: root_dir.join("market.config"),
            root_dir,
        })
    }

    /// Ensure the directory structure exists, creating missing folders.
    pub fn ensure_directories(&self) -> MarketResult<()> {
        fs::create_dir_all(&self.root_dir)?;
        fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }

    /// Directory for cache/state artifacts.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path to persisted client configuration file.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Root directory for all client-managed data.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_derive_from_root() {
        let temp = TempDir::new().unwrap();
        let paths = MarketPaths::new(temp.path()).unwrap();
        assert_eq!(paths.root_dir(), temp.path());
        assert!(paths.config_file().ends_with("market.config"));
        assert!(paths.cache_dir().ends_with("cache"));
    }

    #[test]
    fn ensure_directories_creates_tree() {
        let temp = TempDir::new().unwrap();
        let paths = MarketPaths::new(temp.path().join("nested")).unwrap();
        paths.ensure_directories().unwrap();
        assert!(paths.root_dir().is_dir());
        assert!(paths.cache_dir().is_dir());
    }

    #[test]
    fn empty_root_rejected() {
        assert!(MarketPaths::new("").is_err());
    }
}
