use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const CONFIG_DIR_ENV: &str = "CWS_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const DEFAULT_CONFIG_DIR: &str = "./data/config";

/// Config file location resolution.
pub struct Paths;

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },
}

impl Paths {
    /// Returns the configuration directory.
    /// - Default: ./data/config (relative to the working directory)
    /// - Override: CWS_CONFIG_DIR env var
    pub fn config_dir() -> PathBuf {
        match env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(DEFAULT_CONFIG_DIR),
        }
    }

    /// Returns the full config file path.
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Ensures the config directory exists, creating it if necessary.
    pub fn ensure_config_dir() -> Result<PathBuf, PathError> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir).map_err(|source| PathError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}
