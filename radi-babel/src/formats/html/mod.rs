//! HTML format implementation
//!
//! Renders wiki pages to HTML 3.2 (`html`) or XHTML 1.0 Strict (`xhtml`).
//!
//! # Element Mapping
//!
//! | Wiki element        | HTML                                   |
//! |---------------------|----------------------------------------|
//! | header `== x ==`    | `<h2>x</h2>`                           |
//! | paragraph           | `<p>...</p>`                           |
//! | `*` / `#` lists     | `<ul>`/`<ol>` with `<li>`              |
//! | `;term:data`        | `<dl><dt>term</dt><dd>data</dd></dl>`  |
//! | table rows          | `<table border="1">` with `<tr><td>`   |
//! | `[Page\|label]`     | `<a href="Page.html">label</a>`        |
//! | `[#name]`           | named anchor                           |
//! | `{{pic.png}}`       | `<img src="pic.png">`                  |
//! | `%{red}x%%`         | `<font color="red">` / styled `<span>` |
//!
//! Literal tags come from `tags/html.tags` and `tags/xhtml.tags`; only the
//! hooks in [`HtmlDialect`] produce markup of their own.
//!
//! # Export
//!
//! Every visited page becomes `<page>.html`, wrapped in a document header with
//! a `<base>` pointing at the export directory and an optional stylesheet.

mod dialect;

pub use dialect::{HtmlDialect, HtmlFlavor, LinkStyle};

use crate::error::FormatError;
use crate::export::ExportContext;
use crate::format::{Format, RenderedPage};
use crate::render::{RenderEngine, Rendered};
use crate::tags::TagMap;
use crate::token::TokenSource;
use std::path::Path;

const HTML_DOCTYPE: &str = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n";
const XHTML_DOCTYPE: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3c.org/TR/xhtml1/DTD/xhtml1-strict.dtd\" >\n";

/// Format implementation for HTML and XHTML
pub struct HtmlFormat {
    name: &'static str,
    engine: RenderEngine<HtmlDialect>,
}

impl HtmlFormat {
    /// HTML 3.2 with links between exported files.
    pub fn new() -> Self {
        Self::build("html", HtmlFlavor::Html, LinkStyle::Export)
    }

    /// XHTML 1.0 Strict with links between exported files.
    pub fn xhtml() -> Self {
        Self::build("xhtml", HtmlFlavor::Xhtml, LinkStyle::Export)
    }

    /// HTML 3.2 with `radi://` links for the wiki viewer.
    pub fn browser() -> Self {
        Self::build("html", HtmlFlavor::Html, LinkStyle::Browse)
    }

    fn build(name: &'static str, flavor: HtmlFlavor, links: LinkStyle) -> Self {
        let tags = TagMap::builtin(tag_set(flavor)).unwrap_or_default();
        HtmlFormat {
            name,
            engine: RenderEngine::new(HtmlDialect::new(flavor, links), tags),
        }
    }

    /// Replace the tag map.
    pub fn with_tags(self, tags: TagMap) -> Self {
        HtmlFormat {
            name: self.name,
            engine: RenderEngine::new(*self.engine.dialect(), tags),
        }
    }

    pub fn flavor(&self) -> HtmlFlavor {
        self.engine.dialect().flavor
    }
}

impl Default for HtmlFormat {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag set name for a flavor.
pub fn tag_set(flavor: HtmlFlavor) -> &'static str {
    match flavor {
        HtmlFlavor::Html => "html",
        HtmlFlavor::Xhtml => "xhtml",
    }
}

/// Document header up to and including the opening `<body>`.
pub fn page_header(flavor: HtmlFlavor, title: &str, base: &Path, css: Option<&str>) -> String {
    let base = base.display();
    let mut header = String::new();
    match flavor {
        HtmlFlavor::Html => {
            header.push_str(HTML_DOCTYPE);
            header.push_str(&format!(
                "<html><head><title>{title}</title>\n<base href=\"file://{base}/\">\n"
            ));
            if let Some(css) = css {
                header.push_str(&format!(
                    "<LINK rel=\"stylesheet\" type=\"text/css\" href=\"{css}\">\n"
                ));
            }
            header.push_str("</head><body BGCOLOR=\"#FFFFFF\" >\n");
        }
        HtmlFlavor::Xhtml => {
            header.push_str(XHTML_DOCTYPE);
            header.push_str(&format!(
                "<html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>{title}</title>\n<base href=\"file://{base}/\" />\n"
            ));
            if let Some(css) = css {
                header.push_str(&format!(
                    "<link rel=\"stylesheet\" type=\"text/css\" href=\"{css}\" />\n"
                ));
            }
            header.push_str("</head><body>\n");
        }
    }
    header
}

/// Wrap a rendered body into a complete page.
pub fn wrap_page(flavor: HtmlFlavor, title: &str, body: &str, ctx: &ExportContext<'_>) -> String {
    let base = ctx
        .spec
        .target_dir
        .canonicalize()
        .unwrap_or_else(|_| ctx.spec.target_dir.clone());
    let mut page = page_header(flavor, title, &base, ctx.spec.css.as_deref());
    page.push_str(body);
    page.push_str("</body></html>\n");
    page
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        match self.flavor() {
            HtmlFlavor::Html => "HTML 3.2 pages",
            HtmlFlavor::Xhtml => "XHTML 1.0 Strict pages",
        }
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn render_tokens(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError> {
        self.engine.render_page(input, page)
    }

    fn page_artifact(
        &self,
        page: &RenderedPage,
        ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        let title = self.artifact_name(&page.name, ctx);
        Ok(wrap_page(self.flavor(), &title, &page.rendered.body, ctx))
    }
}
