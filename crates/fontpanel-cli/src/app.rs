//! FontPanelCli application.
//!
//! Wires the loaded [`PanelConfig`] to the web panel, the font commands
//! and the config commands.

use crate::cli::{CliArgs, Command};
use crate::config::PanelConfig;
use crate::{config_handlers, font_handlers};
use fontpanel_api::RouterOptions;
use fontpanel_core::traits::ConfigProvider;
use fontpanel_core::util::paths::looks_like_sillytavern;
use fontpanel_core::{AppState, Error, Result};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

// ============================================================================
// FontPanelCli
// ============================================================================

/// The `fontpanel` command-line application.
pub struct FontPanelCli {
    name: String,
    config: PanelConfig,
    version: String,
}

impl FontPanelCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = PanelConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: PanelConfig) -> Self {
        Self {
            name: name.into(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info,tower_http=warn")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Health) => self.health(),
            Some(Command::Serve { host, port }) => self.serve(host, port).await,
            Some(Command::Fonts(fonts_cmd)) => {
                font_handlers::handle_fonts_command(&self.config, fonts_cmd.command).await
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Report the resolved SillyTavern paths.
    fn health(&self) -> Result<()> {
        let base = self.config.base_path()?;
        let font_dir = self.config.font_dir()?;
        let css_path = self.config.css_path()?;

        println!("{} {}", self.name, self.version);
        println!("  SillyTavern: {}", base.display());
        println!("  Font dir:    {} ({})", font_dir.display(), presence(font_dir.is_dir()));
        println!("  Stylesheet:  {} ({})", css_path.display(), presence(css_path.is_file()));
        println!(
            "  Auth:        {}",
            if self.config.api_key().is_some_and(|k| !k.is_empty()) {
                "api key required"
            } else {
                "open"
            }
        );

        if !base.is_dir() {
            return Err(Error::not_found(format!(
                "SillyTavern directory {} does not exist",
                base.display()
            )));
        }
        Ok(())
    }

    /// Start the web panel until Ctrl-C.
    async fn serve(&self, host: Option<String>, port: Option<u16>) -> Result<()> {
        let state = AppState::new(self.config.clone())?;

        let base = self.config.base_path()?;
        if !looks_like_sillytavern(&base) {
            tracing::warn!(path = %base.display(), "configured path does not look like a SillyTavern install");
        }
        if state.api_key().is_none() {
            tracing::warn!("no api_key configured; the font API is open to anyone who can reach it");
        }

        let host = host.unwrap_or_else(|| self.config.server.host.clone());
        let port = port.unwrap_or(self.config.server.port);
        let addr = resolve_addr(&host, port).await?;
        let options = RouterOptions {
            max_upload_bytes: self.config.server.max_upload_bytes,
        };

        fontpanel_api::serve(state, addr, options).await
    }
}

fn presence(found: bool) -> &'static str {
    if found { "found" } else { "missing" }
}

/// Resolve `host:port` to the first socket address.
async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| Error::config(format!("invalid bind address {host}:{port}: {e}")))?
        .next()
        .ok_or_else(|| Error::config(format!("{host}:{port} did not resolve to an address")))
}

// ============================================================================
// Tests
// ============================================================================
