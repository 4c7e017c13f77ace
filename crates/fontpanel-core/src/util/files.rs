//! Async file utilities for the font store.
//!
//! Thin wrappers over `tokio::fs` that attach the offending path to every
//! error, plus the atomic replace used for `user.css`.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::font::FONT_EXTENSIONS;
use crate::{Error, Result};

/// Information about a font file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name (basename).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Read a file's contents as a string.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Read a file, treating a missing file as empty.
pub async fn read_file_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(Error::io_with_path(e, path)),
    }
}

/// Check if a path exists.
///
/// Only a definite "not found" counts as absent; any other stat failure
/// (permissions, a file where a directory should be) is an error.
pub async fn exists(path: &Path) -> Result<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Create a directory and its parents.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Replace `path` with `content`.
///
/// Writes a sibling temp file first and renames it over the target, so
/// readers see either the old or the new file, never a partial one.
pub async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::invalid_data(format!("Not a file path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    fs::write(&tmp, content)
        .await
        .map_err(|e| Error::io_with_path(e, &tmp))?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::io_with_path(e, path));
    }
    Ok(())
}

/// Write `bytes` to a new file, failing if it already exists.
pub async fn create_new(path: &Path, bytes: &[u8]) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    file.write_all(bytes)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    file.flush().await.map_err(|e| Error::io_with_path(e, path))
}

/// List font files directly inside `dir`, sorted by name.
///
/// A missing directory yields an empty list.
pub async fn list_font_files(dir: &Path) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(Error::io_with_path(e, dir)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(e, dir))?
    {
        let path = entry.path();
        let metadata = entry
            .metadata()
            .await
            .map_err(|e| Error::io_with_path(e, &path))?;
        if !metadata.is_file() {
            continue;
        }

        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_font {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(FileInfo {
            path,
            name,
            size: metadata.len(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
