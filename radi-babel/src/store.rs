//! Page storage capability consumed by exports.
//!
//! A page database is a directory of `<name>.radi` files. Exports only need
//! the three operations of [`PageStore`]; [`FsPageStore`] reads a directory
//! and [`MemoryPageStore`] serves fixed pages for tests.

use crate::error::FormatError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "radi";

/// Text shown for pages that do not exist yet.
pub const NEW_PAGE: &str = "= New File =\n";

/// Source of wiki pages.
pub trait PageStore: Send + Sync {
    /// Page source ready for lexing.
    fn processed_source(&self, name: &str) -> Result<String, FormatError>;

    /// Page text exactly as stored.
    fn raw_source(&self, name: &str) -> Result<String, FormatError>;

    /// Directory that page names and asset paths are relative to.
    fn root(&self) -> &Path;

    /// Extension of stored page files, without the dot.
    fn extension(&self) -> &str {
        DEFAULT_EXTENSION
    }

    /// Canonical page name: surrounding whitespace and the page extension removed.
    fn page_name(&self, name: &str) -> String {
        let name = name.trim();
        let suffix = format!(".{}", self.extension());
        name.strip_suffix(&suffix).unwrap_or(name).to_string()
    }
}

/// Pages stored as files under a directory.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
    extension: String,
    missing_page: Option<String>,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsPageStore {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            missing_page: Some(NEW_PAGE.to_string()),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Text served for missing pages; `None` makes a missing page an error.
    pub fn with_missing_page(mut self, text: Option<String>) -> Self {
        self.missing_page = text;
        self
    }

    /// Path of the file holding `name`.
    pub fn page_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.page_name(name), self.extension))
    }

    fn read(&self, name: &str) -> Result<String, FormatError> {
        let path = self.page_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => match &self.missing_page {
                Some(text) => {
                    tracing::debug!(page = name, "page not found, serving placeholder");
                    Ok(text.clone())
                }
                None => Err(FormatError::io(path, err)),
            },
            Err(err) => Err(FormatError::io(path, err)),
        }
    }
}

impl PageStore for FsPageStore {
    fn processed_source(&self, name: &str) -> Result<String, FormatError> {
        self.read(name)
    }

    fn raw_source(&self, name: &str) -> Result<String, FormatError> {
        self.read(name)
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}

/// In-memory page store.
///
/// # Example
///
/// ```ignore
/// let store = MemoryPageStore::new()
///     .with_page("Start", "= Home =\n[Other]\n")
///     .with_page("Other", "text\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    root: PathBuf,
    raw: HashMap<String, String>,
    processed: HashMap<String, String>,
}

impl MemoryPageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory used to resolve assets.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_page(mut self, name: &str, text: impl Into<String>) -> Self {
        let name = self.page_name(name);
        self.raw.insert(name, text.into());
        self
    }

    /// Override what `processed_source` returns for a page.
    #[must_use]
    pub fn with_processed(mut self, name: &str, text: impl Into<String>) -> Self {
        let name = self.page_name(name);
        self.processed.insert(name, text.into());
        self
    }

    fn missing(&self, name: &str) -> FormatError {
        FormatError::io(
            self.root.join(name),
            io::Error::new(io::ErrorKind::NotFound, format!("no page named '{name}'")),
        )
    }
}

impl PageStore for MemoryPageStore {
    fn processed_source(&self, name: &str) -> Result<String, FormatError> {
        let name = self.page_name(name);
        self.processed
            .get(&name)
            .or_else(|| self.raw.get(&name))
            .cloned()
            .ok_or_else(|| self.missing(&name))
    }

    fn raw_source(&self, name: &str) -> Result<String, FormatError> {
        let name = self.page_name(name);
        self.raw.get(&name).cloned().ok_or_else(|| self.missing(&name))
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
