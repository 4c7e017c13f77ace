//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "fontpanel", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FONTPANEL_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web panel.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print version information.
    Version,

    /// Check that the SillyTavern paths are usable.
    Health,

    /// Font operations without the web panel.
    Fonts(FontsCommand),

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Font-specific subcommands.
#[derive(Parser, Debug)]
pub struct FontsCommand {
    /// Fonts subcommand to execute.
    #[command(subcommand)]
    pub command: FontsAction,
}

/// Available fonts subcommands.
#[derive(Subcommand, Debug)]
pub enum FontsAction {
    /// List registered fonts and font files on disk.
    List,

    /// Unregister a font and delete its file.
    Remove {
        /// CSS alias (font-family) of the rule.
        #[arg(long)]
        family: String,

        /// Font file name.
        #[arg(long)]
        file: String,
    },
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "server.port").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "server.port").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// SillyTavern root (detected from the working directory if omitted).
        #[arg(long)]
        sillytavern_path: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["fontpanel"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_flags() {
        let args = CliArgs::parse_from(["fontpanel", "-v", "--config", "/etc/fp.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/etc/fp.toml"));
    }

    #[test]
    fn test_serve_command_defaults_to_config() {
        let args = CliArgs::parse_from(["fontpanel", "serve"]);
        match args.command {
            Some(Command::Serve { host, port }) => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_serve_command_overrides() {
        let args = CliArgs::parse_from(["fontpanel", "serve", "--host", "127.0.0.1", "-p", "8001"]);
        match args.command {
            Some(Command::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(8001));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_version_and_health_commands() {
        let args = CliArgs::parse_from(["fontpanel", "version"]);
        assert!(matches!(args.command, Some(Command::Version)));
        let args = CliArgs::parse_from(["fontpanel", "health"]);
        assert!(matches!(args.command, Some(Command::Health)));
    }

    #[test]
    fn test_fonts_list_command() {
        let args = CliArgs::parse_from(["fontpanel", "fonts", "list"]);
        assert!(matches!(
            args.command,
            Some(Command::Fonts(FontsCommand {
                command: FontsAction::List
            }))
        ));
    }

    #[test]
    fn test_fonts_remove_command() {
        let args = CliArgs::parse_from([
            "fontpanel", "fonts", "remove", "--family", "Hand", "--file", "hand.ttf",
        ]);
        match args.command {
            Some(Command::Fonts(FontsCommand {
                command: FontsAction::Remove { family, file },
            })) => {
                assert_eq!(family, "Hand");
                assert_eq!(file, "hand.ttf");
            }
            _ => panic!("Expected Fonts Remove command"),
        }
    }

    #[test]
    fn test_fonts_remove_requires_args() {
        assert!(CliArgs::try_parse_from(["fontpanel", "fonts", "remove"]).is_err());
    }

    #[test]
    fn test_config_get_command() {
        let args = CliArgs::parse_from(["fontpanel", "config", "get", "server.port"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Get { key },
            })) => assert_eq!(key, "server.port"),
            _ => panic!("Expected Config Get command"),
        }
    }

    #[test]
    fn test_config_set_command() {
        let args = CliArgs::parse_from(["fontpanel", "config", "set", "api_key", "abc"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Set { key, value },
            })) => {
                assert_eq!(key, "api_key");
                assert_eq!(value, "abc");
            }
            _ => panic!("Expected Config Set command"),
        }
    }

    #[test]
    fn test_config_init_command() {
        let args = CliArgs::parse_from([
            "fontpanel",
            "config",
            "init",
            "--sillytavern-path",
            "/srv/st",
            "--force",
        ]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command:
                    ConfigAction::Init {
                        file,
                        sillytavern_path,
                        force,
                    },
            })) => {
                assert!(file.is_none());
                assert_eq!(sillytavern_path.as_deref(), Some("/srv/st"));
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_config_export_docker_env() {
        let args = CliArgs::parse_from(["fontpanel", "config", "export", "--docker-env"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Export { docker_env },
            })) => assert!(docker_env),
            _ => panic!("Expected Config Export command"),
        }
    }
}
