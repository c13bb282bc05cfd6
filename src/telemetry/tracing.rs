use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::schema::LogSetting;

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: Level,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
        }
    }
}

impl TracingConfig {
    /// Console level from the `log` section; `debug` forces DEBUG.
    pub fn from_log_setting(setting: &LogSetting, debug: bool) -> Self {
        let level = if debug {
            Level::DEBUG
        } else {
            setting.console_log_level.as_tracing_level()
        };
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}

#[derive(Debug)]
pub struct TracingGuard {
    _default_guard: tracing::subscriber::DefaultGuard,
}

/// Installs a stderr subscriber for the current thread until the guard drops.
pub fn init_tracing(config: &TracingConfig) -> TracingGuard {
    let env_filter = resolve_env_filter(config);

    let default_guard = if config.json_format {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_timer(tracing_subscriber::fmt::time::SystemTime);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .set_default()
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_timer(tracing_subscriber::fmt::time::SystemTime);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .set_default()
    };

    TracingGuard {
        _default_guard: default_guard,
    }
}

fn resolve_env_filter(config: &TracingConfig) -> EnvFilter {
    if config.level == Level::DEBUG {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
    }
}
