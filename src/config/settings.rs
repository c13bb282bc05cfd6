//! Process-wide configuration slot.
//!
//! The loaded [`ConfigModel`] is immutable and shared as an `Arc`. Reloading
//! builds a complete new model and swaps the `Arc`; callers holding the old
//! one keep a consistent snapshot of the previous values.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::config::Paths;
use crate::config::loader::{self, ConfigError};
use crate::config::schema::ConfigModel;
use crate::config::validation::validate_config;

static GLOBAL_SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    current: OnceLock<RwLock<Arc<ConfigModel>>>,
    init_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl Settings {
    /// Creates an unloaded slot bound to `path`. Nothing is read until the
    /// first [`Settings::get`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: OnceLock::new(),
            init_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Creates a slot that already holds `model` and never reads `path` on
    /// `get`.
    pub fn with_model(path: impl Into<PathBuf>, model: ConfigModel) -> Self {
        let settings = Self::new(path);
        let _ = settings.current.set(RwLock::new(Arc::new(model)));
        settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.current.get().is_some()
    }

    /// Number of times a document has been read from disk.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Returns the current configuration, loading it on first use.
    ///
    /// Concurrent first callers wait for a single load and all receive the
    /// same instance. A failed first load is not cached.
    pub fn get(&self) -> Result<Arc<ConfigModel>, ConfigError> {
        if let Some(slot) = self.current.get() {
            return Ok(read_slot(slot));
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = self.current.get() {
            return Ok(read_slot(slot));
        }

        let model = Arc::new(self.read_from(&self.path)?);
        let _ = self.current.set(RwLock::new(Arc::clone(&model)));
        Ok(model)
    }

    /// Re-reads the bound path and swaps in the result.
    pub fn reload(&self) -> Result<Arc<ConfigModel>, ConfigError> {
        self.reload_from(&self.path)
    }

    /// Reads `path` and swaps in the result. The bound path is unchanged.
    ///
    /// On failure the current configuration stays in force.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<Arc<ConfigModel>, ConfigError> {
        let path = path.as_ref();
        let model = match self.read_from(path) {
            Ok(model) => Arc::new(model),
            Err(err) => {
                error!(path = %path.display(), error = %err, "Invalid config, keeping current");
                return Err(err);
            }
        };

        self.swap(Arc::clone(&model));
        info!(path = %path.display(), "Configuration reloaded");
        Ok(model)
    }

    /// Normalizes and validates `model`, writes it to the bound path and
    /// makes it current.
    pub fn save(&self, mut model: ConfigModel) -> Result<Arc<ConfigModel>, ConfigError> {
        model.normalize();
        let validation = validate_config(&model);
        if !validation.is_valid() {
            return Err(ConfigError::Validation {
                path: self.path.clone(),
                errors: validation.errors,
            });
        }
        for warning in validation.warnings {
            warn!(field = %warning.field, message = %warning.message, "Config validation warning");
        }

        loader::write(&self.path, &model)?;
        let model = Arc::new(model);
        self.swap(Arc::clone(&model));
        Ok(model)
    }

    fn read_from(&self, path: &Path) -> Result<ConfigModel, ConfigError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        loader::load(path)
    }

    fn swap(&self, model: Arc<ConfigModel>) {
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.current.get() {
            Some(slot) => {
                let mut current = slot.write().unwrap_or_else(PoisonError::into_inner);
                *current = model;
            }
            None => {
                let _ = self.current.set(RwLock::new(model));
            }
        }
    }
}

fn read_slot(slot: &RwLock<Arc<ConfigModel>>) -> Arc<ConfigModel> {
    Arc::clone(&slot.read().unwrap_or_else(PoisonError::into_inner))
}

/// Process-wide settings bound to [`Paths::config_file`].
pub fn global() -> &'static Settings {
    GLOBAL_SETTINGS.get_or_init(|| Settings::new(Paths::config_file()))
}

/// Current process-wide configuration; loads it on first call.
pub fn get() -> Result<Arc<ConfigModel>, ConfigError> {
    global().get()
}

/// Re-reads the process-wide configuration file.
pub fn reload() -> Result<Arc<ConfigModel>, ConfigError> {
    global().reload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Barrier;
    use std::thread;

    fn write_config(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_get_loads_once_and_returns_same_instance() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        write_config(&path, "http:\n  port: 9000\n");

        let settings = Settings::new(&path);
        assert!(!settings.is_loaded());

        let first = settings.get().unwrap();
        let second = settings.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.http.port, 9000);
        assert_eq!(settings.load_count(), 1);
        assert!(settings.is_loaded());
    }

    #[test]
    fn test_get_does_not_reread_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        write_config(&path, "http:\n  port: 9000\n");

        let settings = Settings::new(&path);
        settings.get().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.get().unwrap().http.port, 9000);
        assert_eq!(settings.load_count(), 1);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        write_config(&path, "http:\n  host: 0.0.0.0\n");

        let settings = Settings::new(&path);
        let barrier = Barrier::new(8);
        let (shared, gate) = (&settings, &barrier);

        let results: Vec<Arc<ConfigModel>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        gate.wait();
                        shared.get().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(settings.load_count(), 1);
        for model in &results {
            assert!(Arc::ptr_eq(model, &results[0]));
        }
    }

    #[test]
    fn test_failed_first_load_is_not_cached() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        let settings = Settings::new(&path);
        assert!(matches!(
            settings.get(),
            Err(ConfigError::MissingFile { .. })
        ));
        assert!(!settings.is_loaded());

        write_config(&path, "");
        assert_eq!(*settings.get().unwrap(), ConfigModel::default());
        assert_eq!(settings.load_count(), 2);
    }

    #[test]
    fn test_reload_swaps_instance_and_keeps_old_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        write_config(&path, "http:\n  port: 9000\n");

        let settings = Settings::new(&path);
        let before = settings.get().unwrap();

        write_config(&path, "http:\n  port: 9100\n");
        let reloaded = settings.reload().unwrap();
        let after = settings.get().unwrap();

        assert_eq!(before.http.port, 9000);
        assert_eq!(after.http.port, 9100);
        assert!(Arc::ptr_eq(&reloaded, &after));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_reload_failure_keeps_current() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        write_config(&path, "http:\n  port: 9000\n");

        let settings = Settings::new(&path);
        let before = settings.get().unwrap();

        write_config(&path, "http:\n  port: 0\n");
        assert!(matches!(
            settings.reload(),
            Err(ConfigError::Validation { .. })
        ));
        assert!(Arc::ptr_eq(&before, &settings.get().unwrap()));
    }

    #[test]
    fn test_reload_from_other_path_keeps_bound_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        let other = temp.path().join("other.yaml");
        write_config(&other, "log:\n  console_log_level: DEBUG\n");

        let settings = Settings::new(&path);
        let model = settings.reload_from(&other).unwrap();

        assert!(settings.is_loaded());
        assert_eq!(settings.path(), path.as_path());
        assert_eq!(
            model.log.console_log_level,
            crate::config::models::ConsoleLogLevel::Debug
        );
    }

    #[test]
    fn test_readers_never_observe_mixed_values() {
        let temp = tempfile::tempdir().unwrap();
        let path_a = temp.path().join("a.yaml");
        let path_b = temp.path().join("b.yaml");
        write_config(&path_a, "http:\n  host: a.local\n  port: 1000\n");
        write_config(&path_b, "http:\n  host: b.local\n  port: 2000\n");

        let settings = Settings::new(&path_a);
        settings.get().unwrap();

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let model = settings.get().unwrap();
                        let pair = (model.http.host.as_str(), model.http.port);
                        assert!(pair == ("a.local", 1000) || pair == ("b.local", 2000));
                    }
                });
            }
            scope.spawn(|| {
                for i in 0..50 {
                    let path = if i % 2 == 0 { &path_b } else { &path_a };
                    settings.reload_from(path).unwrap();
                }
            });
        });
    }

    #[test]
    fn test_with_model_skips_disk() {
        let temp = tempfile::tempdir().unwrap();
        let settings = Settings::with_model(temp.path().join("absent.yaml"), ConfigModel::default());

        assert!(settings.is_loaded());
        assert_eq!(*settings.get().unwrap(), ConfigModel::default());
        assert_eq!(settings.load_count(), 0);
    }

    #[test]
    fn test_save_writes_and_swaps() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        let settings = Settings::with_model(&path, ConfigModel::default());

        let mut model = ConfigModel::default();
        model.openai_web.chatgpt_base_url = Some("https://chat.example.com".to_string());
        let saved = settings.save(model).unwrap();

        assert_eq!(
            saved.openai_web.chatgpt_base_url.as_deref(),
            Some("https://chat.example.com/")
        );
        assert!(Arc::ptr_eq(&saved, &settings.get().unwrap()));
        assert_eq!(loader::load(&path).unwrap(), *saved);
    }

    #[test]
    fn test_save_rejects_invalid_model() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        let settings = Settings::with_model(&path, ConfigModel::default());

        let mut model = ConfigModel::default();
        model.common.initial_admin_user_password = "short".to_string();

        assert!(settings.save(model).is_err());
        assert!(!path.exists());
    }
}
