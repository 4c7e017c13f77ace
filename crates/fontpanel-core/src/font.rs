//! Font metadata and input validation.
//!
//! Everything here ends up inside `user.css` or on disk, so values are
//! checked before they reach the stylesheet model or the font directory.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File extensions accepted for upload (compared case-insensitively).
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2"];

/// A font registered in `user.css`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    /// The alias declared by `font-family`.
    pub font_family: String,
    /// Basename of the rule's `src: url(...)`.
    pub file_name: String,
}

/// CSS `font-weight` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Bolder,
    Lighter,
    Numeric(u16),
}

impl FromStr for FontWeight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            "bolder" => Ok(Self::Bolder),
            "lighter" => Ok(Self::Lighter),
            other => match other.parse::<u16>() {
                Ok(n) if (1..=1000).contains(&n) => Ok(Self::Numeric(n)),
                _ => Err(Error::invalid_data(format!("Invalid font weight '{s}'."))),
            },
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Bold => f.write_str("bold"),
            Self::Bolder => f.write_str("bolder"),
            Self::Lighter => f.write_str("lighter"),
            Self::Numeric(n) => write!(f, "{n}"),
        }
    }
}

/// CSS `font-style` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl FromStr for FontStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            "oblique" => Ok(Self::Oblique),
            _ => Err(Error::invalid_data(format!("Invalid font style '{s}'."))),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        })
    }
}

/// A validated font about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFont {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub file_name: String,
}

impl NewFont {
    /// Validate raw form fields into a `NewFont`.
    pub fn parse(family: &str, weight: &str, style: &str, file_name: &str) -> Result<Self> {
        let file_name = validate_upload_name(file_name)?;
        Ok(Self {
            family: validate_family(family)?,
            weight: weight.parse()?,
            style: style.parse()?,
            file_name,
        })
    }
}

/// Check that `name` is a bare file name and return it trimmed.
///
/// Rejects empty names, `.`/`..`, path separators and control characters.
pub fn validate_file_name(name: &str) -> Result<String> {
    let name = name.trim();
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if bad {
        return Err(Error::invalid_data(format!("Invalid file name '{name}'.")));
    }
    Ok(name.to_string())
}

/// Characters that would end or escape the quoted `url('...')` a new rule
/// is written with, or change what the URL points at.
const URL_UNSAFE: &[char] = &['\'', '"', '(', ')', '#', '?', '%', '{', '}', ';', '<', '>', '`'];

/// Check a name for a new font file.
///
/// On top of [`validate_file_name`], the name must be safe to write into
/// `src: url('...')` unescaped and carry one of [`FONT_EXTENSIONS`].
pub fn validate_upload_name(name: &str) -> Result<String> {
    let name = validate_file_name(name)?;
    if let Some(c) = name.chars().find(|c| URL_UNSAFE.contains(c)) {
        return Err(Error::invalid_data(format!(
            "File name '{name}' contains '{c}', which is not allowed in font URLs."
        )));
    }
    check_font_extension(&name)?;
    Ok(name)
}

/// Check that `name` has one of [`FONT_EXTENSIONS`].
pub fn check_font_extension(name: &str) -> Result<()> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext {
        Some(ext) if FONT_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(Error::invalid_data(format!(
            "Unsupported font file '{name}'; expected one of: {}.",
            FONT_EXTENSIONS.join(", ")
        ))),
    }
}

/// Check that `family` can be written inside a quoted CSS string.
pub fn validate_family(family: &str) -> Result<String> {
    let family = family.trim();
    if family.is_empty() {
        return Err(Error::invalid_data("Font family must not be empty."));
    }
    if family
        .chars()
        .any(|c| matches!(c, '\'' | '"' | '{' | '}' | ';' | '\\') || c.is_control())
    {
        return Err(Error::invalid_data(format!(
            "Font family '{family}' contains characters not allowed in CSS."
        )));
    }
    Ok(family.to_string())
}
