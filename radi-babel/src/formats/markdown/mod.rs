//! Markdown output for exchange with other wikis through pandoc
//!
//! The conversion is lossy: colours, centering and super/subscript have no
//! faithful Markdown form. Every page becomes `<page>.md`; internal links
//! point at the neighbouring `.md` files.

mod dialect;

pub use dialect::{format_table, MarkdownDialect};

use crate::error::FormatError;
use crate::format::Format;
use crate::render::{RenderEngine, Rendered};
use crate::tags::TagMap;
use crate::token::TokenSource;

pub struct MarkdownFormat {
    engine: RenderEngine<MarkdownDialect>,
}

impl MarkdownFormat {
    pub fn new() -> Self {
        Self::with_tags(TagMap::builtin("markdown").unwrap_or_default())
    }

    pub fn with_tags(tags: TagMap) -> Self {
        MarkdownFormat {
            engine: RenderEngine::new(MarkdownDialect, tags),
        }
    }
}

impl Default for MarkdownFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown pages for pandoc"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn render_tokens(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError> {
        self.engine.render_page(input, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(source: &str) -> String {
        MarkdownFormat::new().render(source, None).unwrap().body
    }

    #[test]
    fn test_nested_lists_indent() {
        assert_eq!(body("* a\n** b\n* c"), "* a\n    * b\n* c\n");
        assert_eq!(body("# one\n## two"), "1. one\n    1. two\n");
    }

    #[test]
    fn test_headers() {
        assert_eq!(body("= Title =\ntext"), "\n# Title\n\ntext\n\n\n");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(body("**b** //i//"), "**b** *i*\n\n\n");
    }

    #[test]
    fn test_links_and_images() {
        let rendered = MarkdownFormat::new()
            .render("[Other#x|see] [http://a.org|site] {{p.png}}", None)
            .unwrap();
        assert_eq!(
            rendered.body,
            "[see](Other.md#x) [site](http://a.org) ![](p.png)\n\n\n"
        );
        assert_eq!(rendered.links, vec!["Other"]);
        assert_eq!(rendered.assets, vec!["p.png"]);
    }

    #[test]
    fn test_preformatted_is_indented() {
        assert_eq!(body("{{{\na\n  b\n}}}"), "    a\n      b\n");
    }

    #[test]
    fn test_definition() {
        assert_eq!(body(";term:data"), "* **term** data\n\n");
    }

    #[test]
    fn test_quote_block() {
        assert_eq!(
            body("\"\"\"\nfirst line\nsecond\n\"\"\"\nafter"),
            "\n> first line\n> second\n\nafter\n\n\n"
        );
    }

    #[test]
    fn test_links_inside_quote_are_registered() {
        let rendered = MarkdownFormat::new()
            .render("\"\"\"\nsee [A]\n\"\"\"", None)
            .unwrap();
        assert_eq!(rendered.body, "\n> see [A](A.md)\n\n");
        assert_eq!(rendered.links, vec!["A"]);
    }

    #[test]
    fn test_links_and_images_inside_table_are_registered() {
        let rendered = MarkdownFormat::new()
            .render("|[A]|{{p.png}}|", None)
            .unwrap();
        assert!(rendered.body.contains("[A](A.md)      ![](p.png)"));
        assert_eq!(rendered.links, vec!["A"]);
        assert_eq!(rendered.assets, vec!["p.png"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(body("\"\"\"\nquoted"), "\n> quoted\n\n");
    }

    #[test]
    fn test_table_columns_padded() {
        let md = body("|a|bb|\n|ccc|d|");
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "------   -----   ",
                "a        bb      ",
                "ccc      d       ",
                "------   -----   ",
                "",
            ]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = format_table(&[
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ]);
        assert_eq!(
            table,
            "\n----   ----   \na             \nb      c      \n----   ----   \n\n"
        );
    }
}
