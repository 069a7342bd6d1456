//! Render hooks shared by the LaTeX family (article, book, Beamer, Prosper).

use crate::common::links::{is_remote, WikiLink};
use crate::render::{Dialect, RenderState, TableSizing};
use std::path::Path;

const TABULAR: &str = "\\begin{tabular}";
/// Set once the first header of the page carries its label.
const HEADER_SEEN: &str = "latex.header_seen";

/// How images are embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureStyle {
    /// `<stem>.eps` at three quarters of the text width, for `dvips` documents.
    Eps,
    /// The original file scaled into a 7cm x 5cm box, for slides.
    Resized,
}

#[derive(Debug, Clone, Copy)]
pub struct LatexDialect {
    pub figures: FigureStyle,
    /// Emit `\label{page}` after the first header of every page.
    pub label_pages: bool,
}

impl LatexDialect {
    /// Dialect for article and book documents.
    pub fn document() -> Self {
        LatexDialect {
            figures: FigureStyle::Eps,
            label_pages: true,
        }
    }

    /// Dialect for slide decks.
    pub fn slides() -> Self {
        LatexDialect {
            figures: FigureStyle::Resized,
            label_pages: false,
        }
    }

    fn escape_text(&self, text: &str, state: &mut RenderState<'_>) {
        for ch in text.chars() {
            self.escape_char(ch.encode_utf8(&mut [0; 4]), state);
        }
    }
}

/// Column sizing for `tabular`: one centred, ruled column per cell.
pub struct LatexTables;

impl TableSizing for LatexTables {
    fn directive(&self) -> &str {
        TABULAR
    }

    fn sized_directive(&self, columns: usize) -> String {
        format!("{TABULAR}{{|{}}}\n", "c|".repeat(columns))
    }

    fn close_multi(&self) -> &str {
        "}"
    }
}

/// LaTeX spelling of the named symbols the wiki knows about.
fn latex_symbol(name: &str) -> Option<&'static str> {
    let symbol = match name {
        "&auml;" => "\\\"a",
        "&ouml;" => "\\\"o",
        "&uuml;" => "\\\"u",
        "&Auml;" => "\\\"A",
        "&Ouml;" => "\\\"O",
        "&Uuml;" => "\\\"U",
        "&szlig;" => "\\ss{}",
        "&aring;" => "\\aa",
        "&Aring;" => "\\AA",
        _ => return None,
    };
    Some(symbol)
}

impl Dialect for LatexDialect {
    fn escape_char(&self, text: &str, state: &mut RenderState<'_>) {
        match text {
            "~" => state.push_str("\\~{}"),
            "^" => state.push_str("\\^{}"),
            "_" | "%" | "#" | "{" | "}" | "$" | "&" => {
                state.push('\\');
                state.push_str(text);
            }
            "\\" => state.push_str("\\textbackslash{}"),
            other => state.push_str(other),
        }
    }

    fn symbol(&self, text: &str, state: &mut RenderState<'_>) {
        state.push_str(latex_symbol(text).unwrap_or(text));
    }

    fn link(&self, link: &WikiLink, state: &mut RenderState<'_>) {
        if link.is_external() {
            self.escape_text(&link.target, state);
            return;
        }
        // Anchors inside a page have no LaTeX counterpart.
        let page = link.page();
        if page.is_empty() {
            return;
        }
        state.push_str(&format!("\\ref{{{page}}}"));
        state.register_link(page);
    }

    fn image(&self, source: &str, state: &mut RenderState<'_>) {
        state.push_str("\\begin{figure}[!ht]\n");
        match self.figures {
            FigureStyle::Eps => {
                let stem = Path::new(source).with_extension("");
                state.push_str(&format!(
                    "\\includegraphics[width=0.75\\textwidth]{{{}.eps}}",
                    stem.display()
                ));
            }
            FigureStyle::Resized => state.push_str(&format!(
                "\\resizebox{{7cm}}{{5cm}}{{\\includegraphics[width=0.75\\textwidth]{{{source}}}}}"
            )),
        }
        state.push_str("\\end{figure}\n");
        if !is_remote(source) {
            state.register_asset(source);
        }
    }

    /// Verbatim blocks keep their text untouched.
    fn preformatted(&self, text: &str, state: &mut RenderState<'_>) {
        state.tag("startpre");
        state.push_str(text);
        state.tag("endpre");
    }

    fn end_header(&self, depth: usize, state: &mut RenderState<'_>) {
        state.tag(&format!("endheader{depth}"));
        if self.label_pages && !state.flag(HEADER_SEEN) {
            if let Some(page) = state.page() {
                let label = format!("\\label{{{page}}}\n");
                state.push_str(&label);
            }
        }
        state.set_flag(HEADER_SEEN, true);
    }

    fn table_sizing(&self) -> Option<&dyn TableSizing> {
        Some(&LatexTables)
    }
}
