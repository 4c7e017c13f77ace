//! Filesystem-backed font store.
//!
//! [`FontStore`] owns the font directory and `user.css` of one SillyTavern
//! installation. Every operation runs under a single async mutex: CSS
//! edits are read-modify-write cycles and must not interleave.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use crate::css::{self, Stylesheet};
use crate::font::{FontEntry, NewFont, validate_family, validate_file_name, validate_upload_name};
use crate::traits::{ConfigProvider, FONT_URL_PREFIX};
use crate::util::files::{self, FileInfo};
use crate::{Error, Result};

/// Outcome of [`FontStore::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteReport {
    /// Number of `@font-face` rules removed from `user.css`.
    pub rules_removed: usize,
    /// Whether the font file existed and was removed.
    pub file_removed: bool,
}

/// Font files plus the stylesheet that registers them.
#[derive(Debug)]
pub struct FontStore {
    font_dir: PathBuf,
    css_path: PathBuf,
    lock: Mutex<()>,
}

impl FontStore {
    /// Create a store over explicit paths.
    pub fn new(font_dir: impl Into<PathBuf>, css_path: impl Into<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
            css_path: css_path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create a store for the installation described by `config`.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(config.font_dir()?, config.css_path()?))
    }

    /// Directory holding the font files.
    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Path of `user.css`.
    pub fn css_path(&self) -> &Path {
        &self.css_path
    }

    /// Fonts registered in `user.css`. A missing stylesheet means none.
    pub async fn list(&self) -> Result<Vec<FontEntry>> {
        let _guard = self.lock.lock().await;
        let content = files::read_file_or_empty(&self.css_path).await?;
        Ok(Stylesheet::parse(&content).fonts())
    }

    /// Font files present in the font directory.
    pub async fn files(&self) -> Result<Vec<FileInfo>> {
        let _guard = self.lock.lock().await;
        files::list_font_files(&self.font_dir).await
    }

    /// Store a new font file and register it in `user.css`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidData`] if the file name or family cannot be written
    /// into a rule, [`Error::Conflict`] if a file with the same name already
    /// exists. If the stylesheet cannot be updated the new file is removed
    /// again.
    pub async fn upload(&self, font: &NewFont, bytes: &[u8]) -> Result<()> {
        validate_upload_name(&font.file_name)?;
        validate_family(&font.family)?;
        let _guard = self.lock.lock().await;

        files::ensure_dir(&self.font_dir).await?;
        let path = self.font_dir.join(&font.file_name);
        if files::exists(&path).await? {
            return Err(Error::conflict(format!(
                "File '{}' already exists.",
                font.file_name
            )));
        }

        files::create_new(&path, bytes).await.map_err(|e| match e {
            Error::IoWithPath { ref source, .. }
                if source.kind() == std::io::ErrorKind::AlreadyExists =>
            {
                Error::conflict(format!("File '{}' already exists.", font.file_name))
            }
            other => other,
        })?;
        tracing::info!(file = %font.file_name, bytes = bytes.len(), "saved font file");

        if let Err(e) = self.append_rule(font).await {
            tracing::error!(error = %e, file = %font.file_name, "failed to update user.css; removing uploaded file");
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(error = %cleanup, path = %path.display(), "could not remove uploaded file");
            }
            return Err(e);
        }

        tracing::info!(family = %font.family, "registered font in user.css");
        Ok(())
    }

    async fn append_rule(&self, font: &NewFont) -> Result<()> {
        let content = files::read_file_or_empty(&self.css_path).await?;
        let mut sheet = Stylesheet::parse(&content);
        sheet.push_font(font, FONT_URL_PREFIX);
        files::write_atomic(&self.css_path, &css::tidy(&sheet.render())).await
    }

    /// Unregister a font and delete its file.
    ///
    /// Missing rules or a missing file are logged, not treated as errors.
    /// A stylesheet that cannot be read fails the call before the font file
    /// is touched.
    pub async fn delete(&self, family: &str, file_name: &str) -> Result<DeleteReport> {
        let file_name = validate_file_name(file_name)?;
        let _guard = self.lock.lock().await;
        let mut report = DeleteReport::default();

        if files::exists(&self.css_path).await? {
            let content = files::read_file(&self.css_path).await?;
            let mut sheet = Stylesheet::parse(&content);
            report.rules_removed = sheet.remove_font(family, &file_name);
            if report.rules_removed > 0 {
                files::write_atomic(&self.css_path, &css::tidy(&sheet.render())).await?;
                tracing::info!(family, file = %file_name, rules = report.rules_removed, "removed font rules");
            } else {
                tracing::warn!(family, file = %file_name, "no matching font rule in user.css");
            }
        }

        let path = self.font_dir.join(&file_name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                report.file_removed = true;
                tracing::info!(file = %file_name, "deleted font file");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(file = %file_name, "font file to delete was not found");
            }
            Err(e) => return Err(Error::io_with_path(e, &path)),
        }

        Ok(report)
    }

    /// Change the alias of a registered font.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `user.css` is missing or no rule matches.
    pub async fn rename(&self, old_family: &str, new_family: &str, file_name: &str) -> Result<usize> {
        let new_family = validate_family(new_family)?;
        let _guard = self.lock.lock().await;

        if !files::exists(&self.css_path).await? {
            return Err(Error::not_found("user.css not found."));
        }

        let content = files::read_file(&self.css_path).await?;
        let mut sheet = Stylesheet::parse(&content);
        let renamed = sheet.rename_font(old_family, &new_family, file_name);
        if renamed == 0 {
            return Err(Error::not_found("Matching font rule not found to edit."));
        }

        files::write_atomic(&self.css_path, &css::tidy(&sheet.render())).await?;
        tracing::info!(old = old_family, new = %new_family, file = file_name, "renamed font");
        Ok(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontStyle, FontWeight};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> FontStore {
        FontStore::new(
            temp.path().join("public/webfonts/myfonts"),
            temp.path().join("public/css/user.css"),
        )
    }

    fn font(family: &str, file: &str) -> NewFont {
        NewFont {
            family: family.into(),
            weight: FontWeight::Numeric(400),
            style: FontStyle::Normal,
            file_name: file.into(),
        }
    }

    #[tokio::test]
    async fn test_list_without_css_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store(&temp).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.upload(&font("Hand", "hand.ttf"), b"glyphs").await.unwrap();

        let fonts = store.list().await.unwrap();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].font_family, "Hand");
        assert_eq!(fonts[0].file_name, "hand.ttf");

        let bytes = fs::read(store.font_dir().join("hand.ttf")).await.unwrap();
        assert_eq!(bytes, b"glyphs");

        let css = fs::read_to_string(store.css_path()).await.unwrap();
        assert!(css.contains("src: url('/webfonts/myfonts/hand.ttf');"));
        assert!(css.ends_with("}\n"));
    }

    #[tokio::test]
    async fn test_upload_keeps_existing_css() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        files::write_atomic(store.css_path(), "body { margin: 0; }\n")
            .await
            .unwrap();

        store.upload(&font("Hand", "hand.ttf"), b"x").await.unwrap();

        let css = fs::read_to_string(store.css_path()).await.unwrap();
        assert!(css.starts_with("body { margin: 0; }\n\n/* --- Added by Font Manager Panel --- */"));
    }

    #[tokio::test]
    async fn test_upload_conflict() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.upload(&font("Hand", "hand.ttf"), b"one").await.unwrap();

        let err = store
            .upload(&font("Other", "hand.ttf"), b"two")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(ref m) if m == "File 'hand.ttf' already exists."));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_rolls_back_file_when_css_fails() {
        let temp = TempDir::new().unwrap();
        // A directory where user.css should be makes the write fail.
        let css_path = temp.path().join("user.css");
        std::fs::create_dir_all(css_path.join("blocker")).unwrap();
        let store = FontStore::new(temp.path().join("fonts"), &css_path);

        assert!(store.upload(&font("Hand", "hand.ttf"), b"x").await.is_err());
        assert!(!files::exists(&temp.path().join("fonts/hand.ttf")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_rule_and_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.upload(&font("Hand", "hand.ttf"), b"x").await.unwrap();
        store.upload(&font("Mono", "mono.woff2"), b"y").await.unwrap();

        let report = store.delete("Hand", "hand.ttf").await.unwrap();
        assert_eq!(
            report,
            DeleteReport {
                rules_removed: 1,
                file_removed: true
            }
        );

        let fonts = store.list().await.unwrap();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].font_family, "Mono");
        assert!(!files::exists(&store.font_dir().join("hand.ttf")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_everything_succeeds() {
        let temp = TempDir::new().unwrap();
        let report = store(&temp).delete("Ghost", "ghost.ttf").await.unwrap();
        assert_eq!(report, DeleteReport::default());
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let err = store(&temp).delete("X", "../../user.css").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_rename() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.upload(&font("Hand", "hand.ttf"), b"x").await.unwrap();

        assert_eq!(store.rename("Hand", "Script", "hand.ttf").await.unwrap(), 1);
        let fonts = store.list().await.unwrap();
        assert_eq!(fonts[0].font_family, "Script");
    }

    #[tokio::test]
    async fn test_rename_without_css() {
        let temp = TempDir::new().unwrap();
        let err = store(&temp).rename("A", "B", "a.ttf").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "user.css not found."));
    }

    #[tokio::test]
    async fn test_rename_no_match() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.upload(&font("Hand", "hand.ttf"), b"x").await.unwrap();

        let err = store.rename("Hand", "B", "other.ttf").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Matching font rule not found to edit."));
    }

    #[tokio::test]
    async fn test_rename_rejects_bad_family() {
        let temp = TempDir::new().unwrap();
        let err = store(&temp).rename("A", "x'; }", "a.ttf").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_upload_rejects_name_that_breaks_url() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        for name in ["Jane's Hand.ttf", "x');}body{display:none}.ttf"] {
            let err = store.upload(&font("Jane", name), b"x").await.unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)), "{name} accepted");
        }
        assert!(!files::exists(store.css_path()).await.unwrap());
        assert!(store.files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_space_is_listed() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.upload(&font("Jane", "Jane Hand.ttf"), b"x").await.unwrap();

        let fonts = store.list().await.unwrap();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].file_name, "Jane Hand.ttf");

        let report = store.delete("Jane", "Jane Hand.ttf").await.unwrap();
        assert_eq!(report.rules_removed, 1);
    }

    /// Store whose `user.css` sits below a regular file, so every stat of
    /// it fails with something other than "not found".
    fn store_with_unreadable_css(temp: &TempDir) -> FontStore {
        let blocker = temp.path().join("css-is-a-file");
        std::fs::write(&blocker, b"").unwrap();
        FontStore::new(temp.path().join("fonts"), blocker.join("user.css"))
    }

    #[tokio::test]
    async fn test_delete_keeps_file_when_css_unreadable() {
        let temp = TempDir::new().unwrap();
        let store = store_with_unreadable_css(&temp);
        std::fs::create_dir_all(store.font_dir()).unwrap();
        std::fs::write(store.font_dir().join("hand.ttf"), b"x").unwrap();

        let err = store.delete("Hand", "hand.ttf").await.unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
        assert!(store.font_dir().join("hand.ttf").exists());
    }

    #[tokio::test]
    async fn test_rename_reports_io_error_not_missing_css() {
        let temp = TempDir::new().unwrap();
        let err = store_with_unreadable_css(&temp)
            .rename("Hand", "Script", "hand.ttf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_uploads_keep_every_rule() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(store(&temp));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .upload(&font(&format!("Font {i}"), &format!("f{i}.ttf")), b"x")
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 16);
        assert_eq!(store.files().await.unwrap().len(), 16);
    }
}
