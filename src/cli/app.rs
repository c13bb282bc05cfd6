use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cws-config", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file populated with defaults
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
        /// Config file path (default: $CWS_CONFIG_DIR/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the effective configuration
    Show {
        /// Config file path (default: $CWS_CONFIG_DIR/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only show one section (e.g. "http", "openai_web")
        #[arg(long)]
        section: Option<String>,
    },
    /// Validate the configuration file
    Validate {
        /// Config file path (default: $CWS_CONFIG_DIR/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["cws-config"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_version_flag_exits_with_version_error() {
        let result = Cli::try_parse_from(["cws-config", "--version"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_command_defaults() {
        let cli = Cli::try_parse_from(["cws-config", "init"]).unwrap();
        match cli.command {
            Commands::Init { force, path } => {
                assert!(!force);
                assert!(path.is_none());
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_init_command_with_flags() {
        let cli =
            Cli::try_parse_from(["cws-config", "init", "--force", "--path", "/tmp/c.yaml"]).unwrap();
        match cli.command {
            Commands::Init { force, path } => {
                assert!(force);
                assert_eq!(path, Some(PathBuf::from("/tmp/c.yaml")));
            }
            _ => panic!("Expected Init command with flags"),
        }
    }

    #[test]
    fn test_show_command_with_section_and_json() {
        let cli =
            Cli::try_parse_from(["cws-config", "show", "--json", "--section", "http"]).unwrap();
        match cli.command {
            Commands::Show {
                json,
                section,
                path,
            } => {
                assert!(json);
                assert_eq!(section.as_deref(), Some("http"));
                assert!(path.is_none());
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_validate_command_with_global_debug() {
        let cli = Cli::try_parse_from(["cws-config", "validate", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Validate { path: None }));
    }

    #[test]
    fn test_invalid_command_fails() {
        let result = Cli::try_parse_from(["cws-config", "invalid"]);
        assert!(result.is_err());
    }
}
