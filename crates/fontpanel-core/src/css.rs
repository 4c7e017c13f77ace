//! `@font-face` aware model of `user.css`.
//!
//! The stylesheet is kept as an ordered list of segments: `@font-face`
//! blocks and the verbatim text between them. Edits touch only the
//! affected blocks, so every other rule the user wrote stays where it was.
//!
//! Blocks are matched with `@font-face\s*\{[^}]*\}`; nested braces are not
//! valid inside `@font-face`, so no real CSS parser is needed.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::font::{FontEntry, NewFont};

/// Comment written in front of every rule the panel appends.
pub const MARKER: &str = "/* --- Added by Font Manager Panel --- */";

static FONT_FACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)@font-face\s*\{[^}]*\}").expect("valid regex"));

static FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(font-family\s*:\s*['"])([^'"]+)(['"])"#).expect("valid regex")
});

static SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src\s*:\s*url\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex")
});

static TRAILING_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*\s*---\s*Added by Font Manager Panel\s*---\s*\*/\s*\z").expect("valid regex")
});

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid regex"));

/// Every `@font-face { ... }` block in `content`, in order.
pub fn font_face_blocks(content: &str) -> Vec<&str> {
    FONT_FACE_RE.find_iter(content).map(|m| m.as_str()).collect()
}

/// One `@font-face` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaceRule {
    raw: String,
    family: Option<String>,
    src: Option<String>,
}

impl FontFaceRule {
    fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            family: FAMILY_RE.captures(raw).map(|c| c[2].to_string()),
            src: SRC_RE.captures(raw).map(|c| c[1].to_string()),
        }
    }

    /// The block exactly as it appears in the file.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First quoted `font-family` value.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// First quoted `src: url(...)` value.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Basename of the source URL.
    pub fn file_name(&self) -> Option<&str> {
        basename(self.src.as_deref()?)
    }

    /// Basenames of every quoted `url(...)` in the block, in order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        URL_RE
            .captures_iter(&self.raw)
            .filter_map(|c| c.get(1))
            .filter_map(|m| basename(m.as_str()))
    }

    /// Listing entry, if the rule declares both family and source.
    pub fn entry(&self) -> Option<FontEntry> {
        Some(FontEntry {
            font_family: self.family()?.to_string(),
            file_name: self.file_name()?.to_string(),
        })
    }

    /// Same family, and `file_name` is one of the rule's sources.
    fn matches(&self, family: &str, file_name: &str) -> bool {
        self.family() == Some(family) && self.file_names().any(|f| f == file_name)
    }

    fn rename(&mut self, new_family: &str) {
        let renamed = FAMILY_RE.replacen(&self.raw, 1, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], new_family, &caps[3])
        });
        *self = Self::parse(&renamed);
    }
}

fn basename(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next().unwrap_or(url);
    (!name.is_empty()).then_some(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Rule(FontFaceRule),
}

/// Parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    segments: Vec<Segment>,
}

impl Stylesheet {
    /// Split `content` into `@font-face` blocks and surrounding text.
    pub fn parse(content: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for m in FONT_FACE_RE.find_iter(content) {
            if m.start() > last {
                segments.push(Segment::Text(content[last..m.start()].to_string()));
            }
            segments.push(Segment::Rule(FontFaceRule::parse(m.as_str())));
            last = m.end();
        }
        if last < content.len() {
            segments.push(Segment::Text(content[last..].to_string()));
        }
        Self { segments }
    }

    /// Concatenate all segments back into CSS text.
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => t.as_str(),
                Segment::Rule(r) => r.raw(),
            })
            .collect()
    }

    /// All `@font-face` rules, in file order.
    pub fn rules(&self) -> impl Iterator<Item = &FontFaceRule> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Rule(r) => Some(r),
            Segment::Text(_) => None,
        })
    }

    /// Fonts declared by complete rules.
    pub fn fonts(&self) -> Vec<FontEntry> {
        self.rules().filter_map(FontFaceRule::entry).collect()
    }

    /// Remove every rule registering `family` from `file_name`.
    ///
    /// A panel marker comment directly in front of a removed rule goes
    /// with it. Returns the number of rules removed.
    pub fn remove_font(&mut self, family: &str, file_name: &str) -> usize {
        let mut kept: Vec<Segment> = Vec::with_capacity(self.segments.len());
        let mut removed = 0;

        for segment in self.segments.drain(..) {
            match segment {
                Segment::Rule(rule) if rule.matches(family, file_name) => {
                    removed += 1;
                    if let Some(Segment::Text(prev)) = kept.last_mut() {
                        let trimmed_len = TRAILING_MARKER_RE
                            .find(prev)
                            .map_or(prev.len(), |m| m.start());
                        prev.truncate(trimmed_len);
                        if prev.is_empty() {
                            kept.pop();
                        }
                    }
                }
                other => kept.push(other),
            }
        }

        self.segments = kept;
        removed
    }

    /// Change the alias of every rule registering `old` from `file_name`.
    ///
    /// Only the first `font-family` of each matching rule is rewritten.
    /// Returns the number of rules changed.
    pub fn rename_font(&mut self, old: &str, new: &str, file_name: &str) -> usize {
        let mut renamed = 0;
        for segment in &mut self.segments {
            if let Segment::Rule(rule) = segment {
                if rule.matches(old, file_name) {
                    rule.rename(new);
                    renamed += 1;
                }
            }
        }
        renamed
    }

    /// Append a freshly rendered rule for `font`.
    pub fn push_font(&mut self, font: &NewFont, url_prefix: &str) {
        let rendered = render_rule(font, url_prefix);
        let (marker, rule) = rendered.split_at(MARKER.len());
        let lead = if self.render().trim().is_empty() {
            self.segments.clear();
            String::new()
        } else {
            "\n\n".to_string()
        };
        self.segments.push(Segment::Text(format!("{lead}{marker}\n")));
        self.segments
            .push(Segment::Rule(FontFaceRule::parse(rule.trim_start())));
        self.segments.push(Segment::Text("\n".to_string()));
    }
}

/// Render the rule the panel appends for a new font.
pub fn render_rule(font: &NewFont, url_prefix: &str) -> String {
    format!(
        "{MARKER}\n@font-face {{\n  font-family: '{family}';\n  src: url('{prefix}/{file}');\n  font-weight: {weight};\n  font-style: {style};\n}}",
        family = font.family,
        prefix = url_prefix.trim_end_matches('/'),
        file = font.file_name,
        weight = font.weight,
        style = font.style,
    )
}

/// Normalise whitespace before a rewrite.
///
/// Trims the file, collapses runs of blank lines to one, and ends it with
/// a single newline. An empty stylesheet stays empty.
pub fn tidy(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = BLANK_RUN_RE.replace_all(trimmed, "\n\n").into_owned();
    out.push('\n');
    out
}
