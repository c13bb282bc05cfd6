use std::path::PathBuf;

use clap::Parser;

use cws_config::cli::commands::config as config_cmd;
use cws_config::cli::{Cli, Commands};
use cws_config::config::loader;
use cws_config::config::schema::LogSetting;
use cws_config::config::{self, Settings};
use cws_config::telemetry::{TracingConfig, TracingGuard, init_tracing};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logging = LogFlags {
        debug: cli.debug,
        json: cli.json_logs,
    };

    match cli.command {
        Commands::Init { force, path } => {
            let _tracing = logging.init(&LogSetting::default());
            config_cmd::handle_init(force, path)
        }
        Commands::Show {
            path,
            json,
            section,
        } => with_settings(path, logging, |settings| {
            config_cmd::handle_show(settings, json, section.as_deref())
        }),
        Commands::Validate { path } => {
            with_settings(path, logging, config_cmd::handle_validate)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LogFlags {
    debug: bool,
    json: bool,
}

impl LogFlags {
    fn init(self, setting: &LogSetting) -> TracingGuard {
        init_tracing(
            &TracingConfig::from_log_setting(setting, self.debug).with_json_format(self.json),
        )
    }
}

/// Runs `f` against an explicit path, or the process-wide settings, with
/// logging configured from that file's `log` section.
fn with_settings<T>(
    path: Option<PathBuf>,
    logging: LogFlags,
    f: impl FnOnce(&Settings) -> T,
) -> T {
    let explicit = path.map(Settings::new);
    let settings = explicit.as_ref().unwrap_or_else(|| config::global());
    let _tracing = logging.init(&loader::read_log_setting(settings.path()));
    f(settings)
}
