//! Reading, validating and writing the YAML configuration document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::config::schema::{ConfigModel, LogSetting, SECTION_NAMES};
use crate::config::validation::{ValidationError, validate_config};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at {path}; run `cws-config init` to generate one")]
    MissingFile { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("Configuration syntax error in {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("Configuration value error in {path}: {source}")]
    InvalidValue {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Configuration errors in {path}:\n{}", format_errors(.errors))]
    Validation {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl ConfigError {
    /// Validation failures, if this error carries any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation { errors, .. } => errors.as_slice(),
            _ => &[],
        }
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|err| format!("  - {err}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Loads, normalizes and validates the configuration at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<ConfigModel, ConfigError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = parse_str(path, &contents)?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses `contents` as if read from `path`. Missing keys take their
/// defaults; an empty document yields the default configuration.
pub fn parse_str(path: &Path, contents: &str) -> Result<ConfigModel, ConfigError> {
    let mut config = if is_blank_document(contents) {
        debug!(path = %path.display(), "Empty config document; using defaults");
        ConfigModel::default()
    } else {
        let document: Value =
            serde_yaml::from_str(contents).map_err(|err| ConfigError::MalformedDocument {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        match &document {
            Value::Null => ConfigModel::default(),
            Value::Mapping(mapping) => {
                for key in mapping.keys() {
                    let known = key
                        .as_str()
                        .is_some_and(|name| SECTION_NAMES.contains(&name));
                    if !known {
                        warn!(key = ?key, "Ignoring unknown config section");
                    }
                }
                serde_yaml::from_str(contents).map_err(|source| ConfigError::InvalidValue {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => {
                return Err(ConfigError::MalformedDocument {
                    path: path.to_path_buf(),
                    reason: "top level must be a mapping of sections".to_string(),
                });
            }
        }
    };

    for field in config.normalize() {
        debug!(field = %field, "Normalized config value");
    }

    let validation = validate_config(&config);
    for warning in &validation.warnings {
        warn!(field = %warning.field, message = %warning.message, "Config validation warning");
    }
    if !validation.is_valid() {
        return Err(ConfigError::Validation {
            path: path.to_path_buf(),
            errors: validation.errors,
        });
    }

    Ok(config)
}

/// Reads only the `log` section of `path` so logging can be set up before
/// the full load. Any problem yields the defaults; [`load`] reports it.
pub fn read_log_setting(path: impl AsRef<Path>) -> LogSetting {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct LogOnly {
        log: LogSetting,
    }

    fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_yaml::from_str::<Option<LogOnly>>(&contents).ok())
        .flatten()
        .map(|document| document.log)
        .unwrap_or_default()
}

/// Renders `config` as a YAML document.
pub fn to_yaml(config: &ConfigModel) -> Result<String, ConfigError> {
    serde_yaml::to_string(config).map_err(ConfigError::Serialize)
}

/// Writes `config` to `path`, creating parent directories as needed.
pub fn write(path: impl AsRef<Path>, config: &ConfigModel) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let contents = to_yaml(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Configuration written");
    Ok(())
}

fn is_blank_document(contents: &str) -> bool {
    contents.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
