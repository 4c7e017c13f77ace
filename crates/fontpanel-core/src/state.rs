//! Application state management.
//!
//! Provides [`AppState<C>`], a thread-safe container for shared application
//! state that is generic over the configuration provider. It holds the
//! configuration and the [`FontStore`] built from it.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use fontpanel_core::{AppState, ConfigProvider, Result};
//!
//! #[derive(Clone)]
//! struct MyConfig {
//!     root: PathBuf,
//! }
//!
//! impl ConfigProvider for MyConfig {
//!     fn project_name(&self) -> &str { "my-panel" }
//!     fn base_path(&self) -> Result<PathBuf> { Ok(self.root.clone()) }
//!     fn api_key(&self) -> Option<&str> { None }
//! }
//!
//! let state = AppState::new(MyConfig { root: PathBuf::from("/srv/st") }).unwrap();
//!
//! assert_eq!(state.project_name(), "my-panel");
//! assert_eq!(
//!     state.store().css_path(),
//!     PathBuf::from("/srv/st/public/css/user.css").as_path()
//! );
//! ```

use std::sync::Arc;

use crate::store::FontStore;
use crate::traits::ConfigProvider;
use crate::Result;

/// Thread-safe shared application state.
///
/// `AppState` is `Clone`, `Send`, and `Sync`. Cloning is cheap (Arc clone),
/// and all clones share the same store and therefore the same edit lock.
#[derive(Debug)]
pub struct AppState<C: ConfigProvider> {
    config: Arc<C>,
    store: Arc<FontStore>,
}

impl<C: ConfigProvider> AppState<C> {
    /// Create state for `config`, resolving its font paths.
    ///
    /// # Errors
    ///
    /// Fails if the configuration has no SillyTavern path.
    pub fn new(config: C) -> Result<Self> {
        let store = FontStore::from_config(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Create state from a configuration and an already-built store.
    pub fn with_store(config: C, store: FontStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Get a cloneable handle to the configuration.
    pub fn config_arc(&self) -> Arc<C> {
        Arc::clone(&self.config)
    }

    /// The font store.
    pub fn store(&self) -> &FontStore {
        &self.store
    }

    /// Get the project name from the configuration.
    pub fn project_name(&self) -> &str {
        self.config.project_name()
    }

    /// Configured API key, with an empty key treated as none.
    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key().filter(|k| !k.is_empty())
    }
}

impl<C: ConfigProvider> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
        }
    }
}
