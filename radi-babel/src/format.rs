//! Format trait definition
//!
//! A [`Format`] renders wiki pages to one output language and knows how its
//! rendered pages become export artifacts: one file per page, or a single
//! combined document.

use crate::error::FormatError;
use crate::export::ExportContext;
use crate::lexer::WikiLexer;
use crate::normalize::StructuralNormalizer;
use crate::render::Rendered;
use crate::token::TokenSource;

/// How an export lays out its artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One output file per visited page.
    PerPage,
    /// All visited pages concatenated into one document.
    Combined,
}

/// A page that has been rendered during an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub name: String,
    pub rendered: Rendered,
}

/// Trait for output formats
///
/// # Examples
///
/// ```ignore
/// struct Plain(RenderEngine<PlainDialect>);
///
/// impl Format for Plain {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn render_tokens(
///         &self,
///         input: &mut dyn TokenSource,
///         page: Option<&str>,
///     ) -> Result<Rendered, FormatError> {
///         self.0.render_page(input, page)
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The registry name of this format (e.g., "html", "latex")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Output file extensions without the leading dot. The first one names artifacts.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn layout(&self) -> Layout {
        Layout::PerPage
    }

    /// Render a normalized token stream.
    fn render_tokens(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError>;

    /// Lex, normalize and render wiki source text.
    fn render(&self, source: &str, page: Option<&str>) -> Result<Rendered, FormatError> {
        let mut input = StructuralNormalizer::new(WikiLexer::new(source));
        self.render_tokens(&mut input, page)
    }

    /// File name of the artifact for `page` (or for the start page of a combined export).
    fn artifact_name(&self, page: &str, _ctx: &ExportContext<'_>) -> String {
        match self.file_extensions().first() {
            Some(ext) => format!("{page}.{ext}"),
            None => page.to_string(),
        }
    }

    /// Turn one rendered page into a standalone artifact.
    fn page_artifact(
        &self,
        page: &RenderedPage,
        _ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        Ok(page.rendered.body.clone())
    }

    /// Combine every rendered page, in visiting order, into one artifact.
    fn combine(
        &self,
        pages: &[RenderedPage],
        _ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        Ok(pages.iter().map(|p| p.rendered.body.as_str()).collect())
    }
}
