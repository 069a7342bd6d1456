//! Slide decks: Beamer, Prosper and S5
//!
//! A deck is an ordinary dialect wrapped in [`SlideDeck`], which reinterprets
//! headers:
//!
//! - depth 1 is the presentation title. Its text is captured instead of
//!   written and substituted for every `!!TITLE!!` in the template. The
//!   first title of an export wins.
//! - depth 2 starts a slide, closing the previous one when it is still open.
//! - deeper headers are passed to the wrapped dialect up to the deck's
//!   maximum depth and dropped with a warning beyond it.
//!
//! A slide left open at the end of a page is closed there. All pages of an
//! export end up in one artifact, built from a template file holding
//! `!!TITLE!!` and `!!CONTENT!!` placeholders.

use crate::common::links::WikiLink;
use crate::error::FormatError;
use crate::export::ExportContext;
use crate::format::{Format, Layout, RenderedPage};
use crate::formats::html::{HtmlDialect, HtmlFlavor, LinkStyle};
use crate::formats::latex::LatexDialect;
use crate::render::{Dialect, Intercept, RenderEngine, RenderState, Rendered, TableSizing};
use crate::tags::TagMap;
use crate::token::{Token, TokenSource};
use std::fs;
use std::io;

pub const TITLE_PLACEHOLDER: &str = "!!TITLE!!";
pub const CONTENT_PLACEHOLDER: &str = "!!CONTENT!!";

/// A slide has been opened and not yet closed.
const SLIDE_OPEN: &str = "slides.open";

const BEAMER_TEMPLATE: &str = include_str!("../../../templates/beamer.template");
const PROSPER_TEMPLATE: &str = include_str!("../../../templates/prosper.template");
const S5_TEMPLATE: &str = include_str!("../../../templates/s5.template");

/// Title and slide handling layered over another dialect.
#[derive(Debug, Clone, Copy)]
pub struct SlideDeck<D> {
    base: D,
    max_depth: usize,
}

impl<D: Dialect> SlideDeck<D> {
    pub fn new(base: D, max_depth: usize) -> Self {
        SlideDeck { base, max_depth }
    }

    pub fn base(&self) -> &D {
        &self.base
    }

    fn close_slide(&self, state: &mut RenderState<'_>) {
        if state.flag(SLIDE_OPEN) {
            state.tag("endslide");
            state.set_flag(SLIDE_OPEN, false);
        }
    }
}

impl<D: Dialect> Dialect for SlideDeck<D> {
    fn escape_char(&self, text: &str, state: &mut RenderState<'_>) {
        self.base.escape_char(text, state)
    }

    fn symbol(&self, text: &str, state: &mut RenderState<'_>) {
        self.base.symbol(text, state)
    }

    fn link(&self, link: &WikiLink, state: &mut RenderState<'_>) {
        self.base.link(link, state)
    }

    fn image(&self, source: &str, state: &mut RenderState<'_>) {
        self.base.image(source, state)
    }

    fn preformatted(&self, text: &str, state: &mut RenderState<'_>) {
        self.base.preformatted(text, state)
    }

    fn colour(&self, colour: &str, state: &mut RenderState<'_>) {
        self.base.colour(colour, state)
    }

    fn start_header(&self, depth: usize, state: &mut RenderState<'_>) {
        match depth {
            1 => state.begin_capture(),
            2 => {
                self.close_slide(state);
                state.tag("startheader2");
                state.set_flag(SLIDE_OPEN, true);
            }
            d if d <= self.max_depth => self.base.start_header(d, state),
            d => tracing::warn!(depth = d, "header depth not supported in slides, dropped"),
        }
    }

    fn end_header(&self, depth: usize, state: &mut RenderState<'_>) {
        match depth {
            1 => {
                let title = state.end_capture();
                if state.title().is_none() {
                    state.set_title(title);
                }
            }
            2 => state.tag("endheader2"),
            d if d <= self.max_depth => self.base.end_header(d, state),
            _ => {}
        }
    }

    fn definition(&self, term: &str, state: &mut RenderState<'_>) {
        self.base.definition(term, state)
    }

    fn table_sizing(&self) -> Option<&dyn TableSizing> {
        self.base.table_sizing()
    }

    fn intercept(
        &self,
        token: &Token,
        input: &mut dyn TokenSource,
        state: &mut RenderState<'_>,
    ) -> Result<Intercept, FormatError> {
        self.base.intercept(token, input, state)
    }

    fn finish(&self, state: &mut RenderState<'_>) {
        self.base.finish(state);
        self.close_slide(state);
    }
}

/// Substitute title and content into a template.
///
/// Page content is inserted verbatim: a `!!TITLE!!` inside it is left alone.
pub fn fill_template(template: &str, title: &str, content: &str) -> String {
    match template.split_once(CONTENT_PLACEHOLDER) {
        Some((head, tail)) => {
            let mut out = head.replace(TITLE_PLACEHOLDER, title);
            out.push_str(content);
            out.push_str(&tail.replace(TITLE_PLACEHOLDER, title));
            out
        }
        None => {
            tracing::warn!("template has no {CONTENT_PLACEHOLDER} placeholder, content dropped");
            template.replace(TITLE_PLACEHOLDER, title)
        }
    }
}

/// A slide deck format.
pub struct SlideFormat<D> {
    name: &'static str,
    description: &'static str,
    extensions: &'static [&'static str],
    fallback: &'static str,
    engine: RenderEngine<SlideDeck<D>>,
}

impl SlideFormat<LatexDialect> {
    pub fn beamer() -> Self {
        SlideFormat {
            name: "beamer",
            description: "Beamer presentation",
            extensions: &["tex"],
            fallback: BEAMER_TEMPLATE,
            engine: RenderEngine::new(
                SlideDeck::new(LatexDialect::slides(), 2),
                TagMap::builtin("beamer").unwrap_or_default(),
            ),
        }
    }

    pub fn prosper() -> Self {
        SlideFormat {
            name: "prosper",
            description: "Prosper presentation",
            extensions: &["tex"],
            fallback: PROSPER_TEMPLATE,
            engine: RenderEngine::new(
                SlideDeck::new(LatexDialect::slides(), 2),
                TagMap::builtin("prosper").unwrap_or_default(),
            ),
        }
    }
}

impl SlideFormat<HtmlDialect> {
    pub fn s5() -> Self {
        SlideFormat {
            name: "s5",
            description: "S5 slide show",
            extensions: &["html"],
            fallback: S5_TEMPLATE,
            engine: RenderEngine::new(
                SlideDeck::new(HtmlDialect::new(HtmlFlavor::Html, LinkStyle::Export), 5),
                TagMap::builtin("s5").unwrap_or_default(),
            ),
        }
    }
}

impl<D: Dialect + Copy> SlideFormat<D> {
    pub fn with_tags(self, tags: TagMap) -> Self {
        SlideFormat {
            engine: RenderEngine::new(*self.engine.dialect(), tags),
            ..self
        }
    }
}

impl<D: Dialect> SlideFormat<D> {
    /// Template text: the configured file, `<name>.template` in the store
    /// root, or the built-in template when the latter does not exist.
    pub fn load_template(&self, ctx: &ExportContext<'_>) -> Result<String, FormatError> {
        let path = ctx.template_path(self.name);
        match fs::read_to_string(&path) {
            Ok(template) => Ok(template),
            Err(err) if err.kind() == io::ErrorKind::NotFound && ctx.spec.template.is_none() => {
                tracing::debug!(path = %path.display(), "no template file, using built-in template");
                Ok(self.fallback.to_string())
            }
            Err(err) => Err(FormatError::io(path, err)),
        }
    }
}

impl<D: Dialect> Format for SlideFormat<D> {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn file_extensions(&self) -> &[&str] {
        self.extensions
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
        ctx: &ExportContext<'_>,
    ) -> Result<String, FormatError> {
        let template = self.load_template(ctx)?;
        let title = pages
            .iter()
            .find_map(|page| page.rendered.title.as_deref())
            .unwrap_or(ctx.start);
        let content: String = pages.iter().map(|page| page.rendered.body.as_str()).collect();
        Ok(fill_template(&template, title, &content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportSpec;
    use crate::store::MemoryPageStore;
    use std::path::Path;

    const TALK: &str = "= Talk =\n== One ==\ntext\n== Two ==\nmore";

    fn page(format: &dyn Format, name: &str, source: &str) -> RenderedPage {
        RenderedPage {
            name: name.to_string(),
            rendered: format.render(source, Some(name)).unwrap(),
        }
    }

    #[test]
    fn test_beamer_title_and_frames() {
        let rendered = SlideFormat::beamer().render(TALK, None).unwrap();
        assert_eq!(rendered.title.as_deref(), Some("Talk"));
        assert!(!rendered.body.contains("Talk"));
        assert!(rendered
            .body
            .contains("\\begin{frame}\n\\frametitle{One}\n"));
        assert!(rendered
            .body
            .contains("\\end{frame}\n\\begin{frame}\n\\frametitle{Two}\n"));
        assert_eq!(rendered.body.matches("\\begin{frame}").count(), 2);
        assert_eq!(rendered.body.matches("\\end{frame}").count(), 2);
        assert!(rendered.body.ends_with("\\end{frame}\n"));
    }

    #[test]
    fn test_only_first_title_counts() {
        let rendered = SlideFormat::beamer()
            .render("= First =\n= Second =", None)
            .unwrap();
        assert_eq!(rendered.title.as_deref(), Some("First"));
        assert!(!rendered.body.contains("Second"));
    }

    #[test]
    fn test_deep_headers_dropped_in_beamer() {
        let rendered = SlideFormat::beamer().render("=== Deep ===", None).unwrap();
        assert!(rendered.body.contains("Deep"));
        assert!(!rendered.body.contains("section"));
    }

    #[test]
    fn test_prosper_slides() {
        let rendered = SlideFormat::prosper().render("== A ==\nx", None).unwrap();
        assert!(rendered.body.starts_with("\\begin{slide}{A}\n"));
        assert!(rendered.body.ends_with("\\end{slide}\n"));
    }

    #[test]
    fn test_s5_slides_and_subheaders() {
        let rendered = SlideFormat::s5()
            .render("== S ==\n=== sub ===\n<x>", None)
            .unwrap();
        assert!(rendered.body.starts_with("<div class=\"slide\">\n<h1>S</h1>\n"));
        assert!(rendered.body.contains("<h2>sub</h2>\n"));
        assert!(rendered.body.contains("&lt;x&gt;"));
        assert!(rendered.body.ends_with("</div>\n"));
    }

    #[test]
    fn test_fill_template() {
        let filled = fill_template("T=!!TITLE!!\n!!CONTENT!!\nend !!TITLE!!\n", "Deck", "body !!TITLE!!\n");
        assert_eq!(filled, "T=Deck\nbody !!TITLE!!\n\nend Deck\n");
    }

    #[test]
    fn test_template_without_content_placeholder() {
        assert_eq!(fill_template("only !!TITLE!!", "x", "lost"), "only x");
    }

    #[test]
    fn test_combine_uses_store_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("beamer.template"),
            "[!!TITLE!!]\n!!CONTENT!!(end)",
        )
        .unwrap();
        let store = MemoryPageStore::new().with_root(dir.path());
        let spec = ExportSpec::new("beamer", "Start", dir.path().join("out"));
        let ctx = ExportContext {
            spec: &spec,
            store: &store,
            start: "Start",
        };

        let format = SlideFormat::beamer();
        let pages = vec![
            page(&format, "Start", "== A ==\na"),
            page(&format, "Next", "= Late Title =\n== B ==\nb"),
        ];
        let deck = format.combine(&pages, &ctx).unwrap();
        assert!(deck.starts_with("[Late Title]\n\\begin{frame}\n\\frametitle{A}\n"));
        assert!(deck.ends_with("\\end{frame}\n(end)"));
        assert_eq!(deck.matches("\\end{frame}").count(), 2);
    }

    #[test]
    fn test_fallback_template_and_default_title() {
        let store = MemoryPageStore::new().with_root("/nonexistent-radi-store");
        let spec = ExportSpec::new("beamer", "Start", "out");
        let ctx = ExportContext {
            spec: &spec,
            store: &store,
            start: "Start",
        };
        let format = SlideFormat::beamer();
        let deck = format
            .combine(&[page(&format, "Start", "== A ==")], &ctx)
            .unwrap();
        assert!(deck.starts_with("\\documentclass{beamer}\n"));
        assert!(deck.contains("\\title{Start}\n"));
        assert!(!deck.contains(CONTENT_PLACEHOLDER));
    }

    #[test]
    fn test_explicit_template_must_exist() {
        let store = MemoryPageStore::new();
        let spec = ExportSpec::new("s5", "Start", "out")
            .with_template(Path::new("/nonexistent-radi-store/deck.template"));
        let ctx = ExportContext {
            spec: &spec,
            store: &store,
            start: "Start",
        };
        let err = SlideFormat::s5().load_template(&ctx).unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
    }
}
