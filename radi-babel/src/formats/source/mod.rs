//! Raw source re-export
//!
//! Copies a page and everything it links to into another directory, keeping
//! the wiki markup untouched. Links are discovered by rendering each page
//! through the HTML export dialect; the rendered text itself is discarded.

use crate::error::FormatError;
use crate::export::ExportContext;
use crate::format::{Format, RenderedPage};
use crate::formats::html::{HtmlDialect, HtmlFlavor, LinkStyle};
use crate::render::{RenderEngine, Rendered};
use crate::store::DEFAULT_EXTENSION;
use crate::tags::TagMap;
use crate::token::TokenSource;

pub struct SourceFormat {
    engine: RenderEngine<HtmlDialect>,
}

impl SourceFormat {
    pub fn new() -> Self {
        SourceFormat {
            engine: RenderEngine::new(
                HtmlDialect::new(HtmlFlavor::Html, LinkStyle::Export),
                TagMap::builtin("html").unwrap_or_default(),
            ),
        }
    }
}

impl Default for SourceFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for SourceFormat {
    fn name(&self) -> &str {
        DEFAULT_EXTENSION
    }

    fn description(&self) -> &str {
        "Wiki source of the page and every page it links to"
    }

    fn file_extensions(&self) -> &[&str] {
        &[DEFAULT_EXTENSION]
    }

    fn render_tokens(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError> {
        self.engine.render_page(input, page)
    }

    /// Pages keep the store's own file naming.
    fn artifact_name(&self, page: &str, ctx: &ExportContext<'_>) -> String {
        format!("{page}.{}", ctx.store.extension())
    }

    fn page_artifact(
        &self,
        page: &RenderedPage,
        ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        ctx.store.raw_source(&page.name)
    }
}
