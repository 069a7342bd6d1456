//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{HtmlFormat, LatexFormat, MarkdownFormat, SlideFormat, SourceFormat};
use crate::render::Rendered;
use crate::tags::TagMap;
use std::collections::HashMap;
use std::path::Path;

/// Registry of output formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let html = registry.render("**bold**", "html")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
    /// Names in registration order, used for extension detection.
    order: Vec<String>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        if !self.formats.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.formats.insert(name, Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Several formats share an extension; the one registered first wins.
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("out.tex"), Some("latex".to_string()));
    /// ```
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension().and_then(|ext| ext.to_str())?;

        self.order
            .iter()
            .filter_map(|name| self.formats.get(name))
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Render wiki source text with the specified format
    pub fn render(&self, source: &str, format: &str) -> Result<Rendered, FormatError> {
        self.get(format)?.render(source, None)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(HtmlFormat::new());
        registry.register(HtmlFormat::xhtml());
        registry.register(LatexFormat::article());
        registry.register(LatexFormat::book());
        registry.register(MarkdownFormat::new());
        registry.register(SourceFormat::new());
        registry.register(SlideFormat::beamer());
        registry.register(SlideFormat::prosper());
        registry.register(SlideFormat::s5());

        registry
    }

    /// Default formats, with tag maps replaced from `<dir>/<tagset>.tags` where present.
    pub fn with_tags_dir(dir: &Path) -> Result<Self, FormatError> {
        let tags = |name: &str| TagMap::load(name, Some(dir));
        let mut registry = Self::new();

        registry.register(HtmlFormat::new().with_tags(tags("html")?));
        registry.register(HtmlFormat::xhtml().with_tags(tags("xhtml")?));
        registry.register(LatexFormat::article().with_tags(tags("latex")?));
        registry.register(LatexFormat::book().with_tags(tags("latexbook")?));
        registry.register(MarkdownFormat::with_tags(tags("markdown")?));
        registry.register(SourceFormat::new());
        registry.register(SlideFormat::beamer().with_tags(tags("beamer")?));
        registry.register(SlideFormat::prosper().with_tags(tags("prosper")?));
        registry.register(SlideFormat::s5().with_tags(tags("s5")?));

        Ok(registry)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenSource;
    use std::fs;

    // Test format
    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["html"]
        }
        fn render_tokens(
            &self,
            _input: &mut dyn TokenSource,
            _page: Option<&str>,
        ) -> Result<Rendered, FormatError> {
            Ok(Rendered {
                body: "test output".to_string(),
                ..Rendered::default()
            })
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);

        assert_eq!(registry.list_formats(), vec!["test"]);
        assert_eq!(registry.order, vec!["test"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let format = registry.get("test");
        assert!(format.is_ok());
        assert_eq!(format.unwrap().name(), "test");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_render() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let result = registry.render("input", "test").unwrap();
        assert_eq!(result.body, "test output");
        assert!(registry.render("input", "nonexistent").is_err());
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(
            registry.list_formats(),
            vec![
                "beamer",
                "html",
                "latex",
                "latex-book",
                "markdown",
                "prosper",
                "radi",
                "s5",
                "xhtml",
            ]
        );
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.detect_format_from_filename("out/Start.html"),
            Some("html".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("paper.tex"),
            Some("latex".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("notes.md"),
            Some("markdown".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("Start.radi"),
            Some("radi".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
        assert_eq!(registry.detect_format_from_filename("noextension"), None);
    }

    #[test]
    fn test_detect_prefers_first_registered() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(HtmlFormat::new());
        assert_eq!(
            registry.detect_format_from_filename("a.html"),
            Some("test".to_string())
        );
    }

    #[test]
    fn test_with_tags_dir_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("html.tags"), "startbold=<strong>\n").unwrap();

        let registry = FormatRegistry::with_tags_dir(dir.path()).unwrap();
        let html = registry.render("**x**", "html").unwrap();
        assert_eq!(html.body, "<strong>x\n");
        let xhtml = registry.render("**x**", "xhtml").unwrap();
        assert!(xhtml.body.starts_with("<p><strong>x</strong>"));
    }
}
