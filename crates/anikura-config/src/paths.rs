use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base path override for container deployments.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("ANIKURA_BASE_PATH").ok().map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("anikura");
        Ok(Self::from_base(base_dir))
    }

    /// Root everything under an explicit base directory. Also what tests
    /// and container deployments use.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("anikura.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }
        Self::new().unwrap_or_else(|_| Self::from_base("/app"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_base_lays_out_subdirectories() {
        let pm = PathManager::from_base("/tmp/anikura-test");
        assert_eq!(pm.config_file(), PathBuf::from("/tmp/anikura-test/config.toml"));
        assert_eq!(pm.data_dir(), Path::new("/tmp/anikura-test/data"));
        assert_eq!(pm.log_file(), PathBuf::from("/tmp/anikura-test/logs/anikura.log"));
    }

    #[test]
    fn ensure_directories_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let pm = PathManager::from_base(dir.path().join("nested"));
        pm.ensure_directories().unwrap();
        assert!(pm.data_dir().is_dir());
        assert!(pm.log_dir().is_dir());
    }
}
