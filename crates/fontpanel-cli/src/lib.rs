//! Command-line entry point for Font Panel.
//!
//! # Modules
//!
//! - [`cli`]: clap argument and subcommand definitions
//! - [`config`]: [`config::PanelConfig`] loading from TOML, env, or legacy JSONC
//! - [`app`]: The [`app::FontPanelCli`] dispatcher
//! - [`font_handlers`]: `fonts list` and `fonts remove`
//! - [`config_handlers`]: `config path|get|set|init|export`

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod font_handlers;

pub use app::FontPanelCli;
pub use cli::CliArgs;
pub use config::PanelConfig;
