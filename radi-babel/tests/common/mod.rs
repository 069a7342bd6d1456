//! Helpers shared by the integration tests.

use radi_babel::FormatRegistry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Render wiki source with a registered format and return the body.
pub fn render(format: &str, source: &str) -> String {
    FormatRegistry::default()
        .render(source, format)
        .unwrap_or_else(|err| panic!("{format} render failed: {err}"))
        .body
}

/// A page database on disk holding the given `(name, source)` pages.
pub fn wiki(pages: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in pages {
        fs::write(dir.path().join(format!("{name}.radi")), source).unwrap();
    }
    dir
}

pub fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|err| panic!("cannot read {file}: {err}"))
}
