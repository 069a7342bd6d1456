//! Error types for rendering and export operations

use crate::token::TokenKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while normalizing, rendering or exporting pages
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// The normalizer state stack is corrupted
    #[error("Structural error: {0}")]
    InvalidState(String),

    /// A token reached the tag lookup without a semantic name
    #[error("Bad token mapping: no semantic name for {0:?}")]
    UnmappedToken(TokenKind),

    /// A tag map source contained a malformed line
    #[error("Tag map error on line {line}: {message}")]
    TagMap { line: usize, message: String },

    /// Operation not supported by this format
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Reading a page or writing an artifact failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.into(),
            source,
        }
    }
}
