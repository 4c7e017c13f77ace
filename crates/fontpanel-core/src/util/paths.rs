//! Path resolution utilities.
//!
//! Helpers for turning configured paths into usable ones and for locating
//! a SillyTavern installation on disk.

use std::path::{Path, PathBuf};

/// Maximum number of parent directories to walk when searching for a marker.
pub const MAX_WALK_LEVELS: usize = 10;

/// Walks up the directory tree from `start` looking for a directory containing `marker`.
///
/// Returns the directory containing the marker file/directory, or None if not found
/// within [`MAX_WALK_LEVELS`] iterations.
///
/// # Example
///
/// ```no_run
/// use fontpanel_core::util::paths::find_dir_with_marker;
///
/// // A SillyTavern checkout has `public/` next to `server.js`.
/// if let Some(root) = find_dir_with_marker(".", "server.js") {
///     println!("SillyTavern root: {:?}", root);
/// }
/// ```
pub fn find_dir_with_marker<P: AsRef<Path>>(start: P, marker: &str) -> Option<PathBuf> {
    let mut current = start.as_ref().to_path_buf();

    for _ in 0..MAX_WALK_LEVELS {
        if current.join(marker).exists() {
            return Some(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    None
}

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
///
/// # Example
///
/// ```
/// use fontpanel_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/SillyTavern");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// True if `root` looks like a SillyTavern installation (has `public/`).
pub fn looks_like_sillytavern(root: &Path) -> bool {
    root.join("public").is_dir()
}
