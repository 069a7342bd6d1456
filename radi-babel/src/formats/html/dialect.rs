//! Render hooks for HTML and XHTML output.

use crate::common::links::{is_remote, with_anchor, WikiLink};
use crate::render::{Dialect, RenderState};

/// HTML dialect variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlFlavor {
    /// HTML 3.2, as shown by the wiki viewer.
    Html,
    /// XHTML 1.0 Strict.
    Xhtml,
}

/// How internal page links are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `radi://Page.radi#anchor`, resolved by the wiki viewer.
    Browse,
    /// `Page.html#anchor`, relative links between exported files.
    Export,
}

#[derive(Debug, Clone, Copy)]
pub struct HtmlDialect {
    pub flavor: HtmlFlavor,
    pub links: LinkStyle,
}

impl HtmlDialect {
    pub fn new(flavor: HtmlFlavor, links: LinkStyle) -> Self {
        HtmlDialect { flavor, links }
    }

    fn escape_text(&self, text: &str, state: &mut RenderState<'_>) {
        for ch in text.chars() {
            self.escape_char(ch.encode_utf8(&mut [0; 4]), state);
        }
    }

    fn page_href(&self, link: &WikiLink) -> String {
        let page = link.page();
        let base = match self.links {
            LinkStyle::Browse => format!("radi://{page}.radi"),
            LinkStyle::Export => format!("{page}.html"),
        };
        with_anchor(base, link)
    }
}

impl Dialect for HtmlDialect {
    fn escape_char(&self, text: &str, state: &mut RenderState<'_>) {
        match text {
            "<" => state.push_str("&lt;"),
            ">" => state.push_str("&gt;"),
            "&" => state.push_str("&amp;"),
            "\"" => state.push_str("&quot;"),
            "\\" => state.push_str("&#92;"),
            other => state.push_str(other),
        }
    }

    fn link(&self, link: &WikiLink, state: &mut RenderState<'_>) {
        if link.is_anchor() {
            let name = link.target.trim_start_matches('#');
            let attribute = match self.flavor {
                HtmlFlavor::Html => "name",
                HtmlFlavor::Xhtml => "id",
            };
            state.push_str(&format!("<a {attribute}=\"{name}\"></a>"));
            return;
        }
        let href = if link.is_external() {
            link.target.clone()
        } else {
            state.register_link(link.page());
            self.page_href(link)
        };
        state.push_str(&format!("<a href=\"{href}\">"));
        self.escape_text(&link.label, state);
        state.push_str("</a>");
    }

    fn image(&self, source: &str, state: &mut RenderState<'_>) {
        match self.flavor {
            HtmlFlavor::Html => state.push_str(&format!("<img src=\"{source}\">")),
            HtmlFlavor::Xhtml => {
                state.push_str(&format!("<img src=\"{source}\" alt=\"{source}\" />"))
            }
        }
        if !is_remote(source) {
            state.register_asset(source);
        }
    }

    fn colour(&self, colour: &str, state: &mut RenderState<'_>) {
        match self.flavor {
            HtmlFlavor::Html => state.push_str(&format!("<font color=\"{colour}\">")),
            HtmlFlavor::Xhtml => state.push_str(&format!("<span style=\"color: {colour}\">")),
        }
    }
}
