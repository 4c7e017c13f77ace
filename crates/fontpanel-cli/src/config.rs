//! Configuration for the Font Panel binary.
//!
//! Provides the [`PanelConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate, or from
//! a legacy `config.jsonc` file.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FONTPANEL_CONFIG` environment variable
//! 3. `./config.jsonc` in the working directory
//! 4. XDG default: `~/.config/fontpanel/config.toml`
//! 5. Built-in defaults

use confyg::{Confygery, env};
use fontpanel_api::DEFAULT_MAX_UPLOAD_BYTES;
use fontpanel_core::traits::ConfigProvider;
use fontpanel_core::util::paths::expand_tilde;
use fontpanel_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Legacy config file looked up in the working directory.
pub const LEGACY_CONFIG_FILE: &str = "config.jsonc";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Project name, shown in logs and the health endpoint.
    pub project_name: String,

    /// Root of the SillyTavern installation.
    pub sillytavern_path: Option<String>,

    /// API key for the `/api` routes. Unset or empty disables auth.
    pub api_key: Option<String>,

    /// Server configuration.
    pub server: ServerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Largest accepted upload request, in bytes.
    pub max_upload_bytes: usize,
}

/// Shape of the legacy `config.jsonc` file.
#[derive(Debug, Default, Deserialize)]
struct LegacyConfig {
    sillytavern_path: Option<String>,
    api_key: Option<String>,
    port: Option<u16>,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            project_name: "fontpanel".to_string(),
            sillytavern_path: None,
            api_key: None,
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<LegacyConfig> for PanelConfig {
    fn from(legacy: LegacyConfig) -> Self {
        let mut config = Self {
            sillytavern_path: legacy.sillytavern_path,
            api_key: legacy.api_key,
            ..Self::default()
        };
        if let Some(port) = legacy.port {
            config.server.port = port;
        }
        config
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl PanelConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// `.json`/`.jsonc` files are read as JSON with comments; anything else
    /// is TOML with a `FONTPANEL_*` environment overlay.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(config_path) {
            Some(path) if path.exists() && is_json_path(&path) => Self::load_jsonc(&path),
            other => Self::load_toml(other.as_deref()),
        }
    }

    fn load_toml(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = path {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("FONTPANEL");
        env_opts.add_section("server");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        tracing::debug!(path = ?path, "loaded TOML configuration");
        Ok(config)
    }

    /// Load a legacy JSON-with-comments file.
    pub fn load_jsonc(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let legacy: LegacyConfig = serde_json::from_str(&strip_json_comments(&content))
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded legacy JSONC configuration");
        Ok(legacy.into())
    }

    /// Resolve the config file path from flag, env var, legacy file, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("FONTPANEL_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let legacy = PathBuf::from(LEGACY_CONFIG_FILE);
        if legacy.exists() {
            return Some(legacy);
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fontpanel").join("config.toml"))
    }

    /// Check that the settings needed to touch SillyTavern are present.
    pub fn validate(&self) -> Result<()> {
        match self.sillytavern_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Ok(()),
            _ => Err(Error::config(
                "'sillytavern_path' must be set in the configuration",
            )),
        }
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `FONTPANEL_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "FONTPANEL", &mut vars);
        Ok(vars)
    }
}

fn is_json_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("jsonc")
    )
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for PanelConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn base_path(&self) -> Result<PathBuf> {
        self.validate()?;
        let path = self.sillytavern_path.as_deref().unwrap_or_default().trim();
        Ok(expand_tilde(path))
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Remove `//` and `/* */` comments outside JSON strings.
///
/// Block comments become a single space so tokens on either side stay apart.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some(&'/')) => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            ('/', Some(&'*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
