//! Tag maps: per-format tables from semantic names to literal output
//!
//! A tag map is loaded once per renderer from `key=value` lines and is
//! read-only afterwards. Blank lines and lines starting with `#` or `!` are
//! ignored. Values may use the escapes `\n`, `\t` and `\\`.
//!
//! The built-in maps for every format are compiled in from `tags/*.tags`.
//! A missing key is not an error: the renderer simply emits nothing for it.

use crate::error::FormatError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const HTML_TAGS: &str = include_str!("../tags/html.tags");
const XHTML_TAGS: &str = include_str!("../tags/xhtml.tags");
const LATEX_TAGS: &str = include_str!("../tags/latex.tags");
const LATEX_BOOK_TAGS: &str = include_str!("../tags/latexbook.tags");
const BEAMER_TAGS: &str = include_str!("../tags/beamer.tags");
const PROSPER_TAGS: &str = include_str!("../tags/prosper.tags");
const S5_TAGS: &str = include_str!("../tags/s5.tags");
const MARKDOWN_TAGS: &str = include_str!("../tags/markdown.tags");

/// Immutable mapping from semantic names to output literals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: BTreeMap<String, String>,
}

impl TagMap {
    /// Parse tag map source text.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut entries = BTreeMap::new();
        for (index, line) in source.lines().enumerate() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| FormatError::TagMap {
                line: index + 1,
                message: format!("expected key=value, found '{line}'"),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(FormatError::TagMap {
                    line: index + 1,
                    message: "empty key".to_string(),
                });
            }
            entries.insert(key.to_string(), unescape(value.trim_start()));
        }
        Ok(TagMap { entries })
    }

    /// Read and parse a tag map file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| FormatError::io(path, err))?;
        Self::parse(&source)
    }

    /// Built-in map for a tag set name (`html`, `latex`, `markdown`, ...).
    pub fn builtin(name: &str) -> Option<Self> {
        let source = match name {
            "html" => HTML_TAGS,
            "xhtml" => XHTML_TAGS,
            "latex" => LATEX_TAGS,
            "latexbook" => LATEX_BOOK_TAGS,
            "beamer" => BEAMER_TAGS,
            "prosper" => PROSPER_TAGS,
            "s5" => S5_TAGS,
            "markdown" => MARKDOWN_TAGS,
            _ => return None,
        };
        // Built-in sources are covered by tests; a parse failure here is a packaging bug.
        Self::parse(source).ok()
    }

    /// Built-in map, replaced by `<dir>/<name>.tags` when that file exists.
    pub fn load(name: &str, override_dir: Option<&Path>) -> Result<Self, FormatError> {
        if let Some(dir) = override_dir {
            let path = dir.join(format!("{name}.tags"));
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading tag map override");
                return Self::from_file(path);
            }
        }
        Self::builtin(name).ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
