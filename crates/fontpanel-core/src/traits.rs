//! Core traits for Font Panel configuration.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where the
//! SillyTavern installation lives and how requests are authenticated.
//! The CLI ships one implementation (`PanelConfig`); tests use their own.

use std::path::PathBuf;

use crate::Result;

/// Directory, relative to the SillyTavern root, that holds uploaded fonts.
pub const FONT_DIR: &str = "public/webfonts/myfonts";

/// Stylesheet, relative to the SillyTavern root, that registers fonts.
pub const USER_CSS: &str = "public/css/user.css";

/// URL prefix under which SillyTavern serves [`FONT_DIR`].
pub const FONT_URL_PREFIX: &str = "/webfonts/myfonts";

/// Trait for the configuration a panel instance runs with.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use fontpanel_core::traits::ConfigProvider;
/// use fontpanel_core::Result;
///
/// #[derive(Clone)]
/// struct LocalConfig {
///     root: PathBuf,
/// }
///
/// impl ConfigProvider for LocalConfig {
///     fn project_name(&self) -> &str {
///         "local"
///     }
///
///     fn base_path(&self) -> Result<PathBuf> {
///         Ok(self.root.clone())
///     }
///
///     fn api_key(&self) -> Option<&str> {
///         None
///     }
/// }
///
/// let config = LocalConfig { root: PathBuf::from("/srv/st") };
/// assert_eq!(
///     config.css_path().unwrap(),
///     PathBuf::from("/srv/st/public/css/user.css")
/// );
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used in log lines and the health report.
    fn project_name(&self) -> &str;

    /// Root of the SillyTavern installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not configured.
    fn base_path(&self) -> Result<PathBuf>;

    /// API key requests must present as a bearer token.
    ///
    /// `None` (or an empty key) disables authentication.
    fn api_key(&self) -> Option<&str>;

    /// Directory that holds uploaded font files.
    fn font_dir(&self) -> Result<PathBuf> {
        Ok(self.base_path()?.join(FONT_DIR))
    }

    /// The `user.css` stylesheet that registers fonts.
    fn css_path(&self) -> Result<PathBuf> {
        Ok(self.base_path()?.join(USER_CSS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Clone)]
    struct Fixed(Option<PathBuf>);

    impl ConfigProvider for Fixed {
        fn project_name(&self) -> &str {
            "fixed"
        }

        fn base_path(&self) -> Result<PathBuf> {
            self.0
                .clone()
                .ok_or_else(|| Error::config("sillytavern_path is not set"))
        }

        fn api_key(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_default_font_dir() {
        let config = Fixed(Some(PathBuf::from("/st")));
        assert_eq!(
            config.font_dir().unwrap(),
            PathBuf::from("/st/public/webfonts/myfonts")
        );
    }

    #[test]
    fn test_default_css_path() {
        let config = Fixed(Some(PathBuf::from("/st")));
        assert_eq!(
            config.css_path().unwrap(),
            PathBuf::from("/st/public/css/user.css")
        );
    }

    #[test]
    fn test_paths_propagate_missing_base() {
        let config = Fixed(None);
        assert!(matches!(config.font_dir(), Err(Error::Config(_))));
        assert!(matches!(config.css_path(), Err(Error::Config(_))));
    }
}
