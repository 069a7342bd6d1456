//! LaTeX article and book output
//!
//! Every page reached by an export is rendered in visiting order into one
//! document:
//!
//! ```text
//! <dochead tag>
//! \usepackage[dvips]{graphicx}
//!
//! \begin{document}
//! <page>...
//! \end{document}
//! ```
//!
//! Internal links become `\ref{page}` and the first header of each page
//! carries a matching `\label{page}`, so cross references resolve inside the
//! combined document. Tables are sized after the fact by [`LatexTables`].

mod dialect;

pub use dialect::{FigureStyle, LatexDialect, LatexTables};

use crate::error::FormatError;
use crate::export::ExportContext;
use crate::format::{Format, Layout, RenderedPage};
use crate::render::{RenderEngine, Rendered};
use crate::tags::TagMap;
use crate::token::TokenSource;

const PREAMBLE: &str = "\\usepackage[dvips]{graphicx}\n\n\\begin{document}\n";
const POSTAMBLE: &str = "\n\\end{document}\n";

/// Document class flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentClass {
    Article,
    Book,
}

pub struct LatexFormat {
    class: DocumentClass,
    engine: RenderEngine<LatexDialect>,
}

impl LatexFormat {
    pub fn article() -> Self {
        Self::new(DocumentClass::Article)
    }

    pub fn book() -> Self {
        Self::new(DocumentClass::Book)
    }

    pub fn new(class: DocumentClass) -> Self {
        let tags = TagMap::builtin(tag_set(class)).unwrap_or_default();
        LatexFormat {
            class,
            engine: RenderEngine::new(LatexDialect::document(), tags),
        }
    }

    pub fn with_tags(self, tags: TagMap) -> Self {
        LatexFormat {
            class: self.class,
            engine: RenderEngine::new(*self.engine.dialect(), tags),
        }
    }
}

/// Tag set name for a document class.
pub fn tag_set(class: DocumentClass) -> &'static str {
    match class {
        DocumentClass::Article => "latex",
        DocumentClass::Book => "latexbook",
    }
}

impl Format for LatexFormat {
    fn name(&self) -> &str {
        match self.class {
            DocumentClass::Article => "latex",
            DocumentClass::Book => "latex-book",
        }
    }

    fn description(&self) -> &str {
        match self.class {
            DocumentClass::Article => "LaTeX article, all pages in one document",
            DocumentClass::Book => "LaTeX book, all pages in one document",
        }
    }

    fn file_extensions(&self) -> &[&str] {
        &["tex"]
    }

    fn layout(&self) -> Layout {
        Layout::Combined
    }

    fn render_tokens(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError> {
        self.engine.render_page(input, page)
    }

    fn combine(
        &self,
        pages: &[RenderedPage],
        _ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        let mut document = self.engine.tags().get("dochead").unwrap_or_default().to_string();
        document.push_str(PREAMBLE);
        for page in pages {
            document.push_str(&page.rendered.body);
        }
        document.push_str(POSTAMBLE);
        Ok(document)
    }
}
