//! The render engine shared by every output format.
//!
//! [`RenderEngine`] pulls a normalized token stream and turns each token into
//! output text. Most kinds are looked up in the format's [`TagMap`] by their
//! semantic name. A handful are routed to [`Dialect`] hooks instead:
//! characters, links, images, preformatted blocks, colour spans, headers,
//! definition terms and multi-column table markers.
//!
//! A format is the pair of a tag map and a dialect. Dialects are immutable;
//! everything a render pass mutates lives in [`RenderState`], which is
//! created per call and threaded through the hooks. Rendering the same
//! stream twice with the same engine therefore yields the same output.

use crate::common::links::{image_source, WikiLink};
use crate::error::FormatError;
use crate::lexer::WikiLexer;
use crate::normalize::StructuralNormalizer;
use crate::tags::TagMap;
use crate::token::{Token, TokenKind, TokenSource};
use std::collections::HashSet;

/// Deepest header level with a tag pair.
pub const MAX_HEADER_DEPTH: usize = 5;

/// Result of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    /// Text of a deferred title, for formats that extract one.
    pub title: Option<String>,
    /// Internal pages referenced by links, in order of appearance.
    pub links: Vec<String>,
    /// Local files referenced by images.
    pub assets: Vec<String>,
}

/// What a dialect's interceptor did with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    /// Continue with the normal dispatch.
    Pass,
    /// The token (and possibly followers) was consumed.
    Handled,
    /// The interceptor reached end of stream while consuming.
    EndOfStream,
}

/// Deferred column sizing for formats that declare table width up front.
pub trait TableSizing: Send + Sync {
    /// Directive written by the `tablestart` tag, to be patched at table close.
    fn directive(&self) -> &str;

    /// Replacement for [`TableSizing::directive`] once the column count is known.
    fn sized_directive(&self, columns: usize) -> String;

    /// Text closing an open multi-column cell.
    fn close_multi(&self) -> &str;
}

#[derive(Debug, Default)]
struct TableScan {
    start: usize,
    row: usize,
    widest: usize,
    multi_open: bool,
}

/// Mutable state of a single render pass.
pub struct RenderState<'t> {
    tags: &'t TagMap,
    out: String,
    capture: Option<String>,
    page: Option<String>,
    title: Option<String>,
    links: Vec<String>,
    assets: Vec<String>,
    table: TableScan,
    flags: HashSet<&'static str>,
    nesting: usize,
}

impl<'t> RenderState<'t> {
    pub fn new(tags: &'t TagMap, page: Option<&str>) -> Self {
        RenderState {
            tags,
            out: String::new(),
            capture: None,
            page: page.map(str::to_string),
            title: None,
            links: Vec::new(),
            assets: Vec::new(),
            table: TableScan::default(),
            flags: HashSet::new(),
            nesting: 0,
        }
    }

    pub fn tags(&self) -> &'t TagMap {
        self.tags
    }

    /// Name of the page being rendered, when known.
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn push_str(&mut self, text: &str) {
        match self.capture.as_mut() {
            Some(capture) => capture.push_str(text),
            None => self.out.push_str(text),
        }
    }

    pub fn push(&mut self, ch: char) {
        match self.capture.as_mut() {
            Some(capture) => capture.push(ch),
            None => self.out.push(ch),
        }
    }

    /// Append the tag value for `name`; a missing key appends nothing.
    pub fn tag(&mut self, name: &str) {
        if let Some(value) = self.tags.get(name) {
            self.push_str(value);
        }
    }

    pub fn register_link(&mut self, page: impl Into<String>) {
        self.links.push(page.into());
    }

    pub fn register_asset(&mut self, path: impl Into<String>) {
        self.assets.push(path.into());
    }

    /// Divert output into a side buffer until [`RenderState::end_capture`].
    pub fn begin_capture(&mut self) {
        self.capture = Some(String::new());
    }

    pub fn end_capture(&mut self) -> String {
        self.capture.take().unwrap_or_default()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Dialect scratch flag, named by the dialect that owns it.
    pub fn flag(&self, name: &'static str) -> bool {
        self.flags.contains(name)
    }

    pub fn set_flag(&mut self, name: &'static str, on: bool) {
        if on {
            self.flags.insert(name);
        } else {
            self.flags.remove(name);
        }
    }

    /// Nesting counter for dialects that indent instead of tagging.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    pub fn enter(&mut self) {
        self.nesting += 1;
    }

    pub fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Text written to the main buffer so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    fn finish(self) -> Rendered {
        let mut body = self.out;
        if let Some(pending) = self.capture {
            body.push_str(&pending);
        }
        Rendered {
            body,
            title: self.title,
            links: self.links,
            assets: self.assets,
        }
    }
}

/// Format-specific hooks.
///
/// Every method has a default that works for flat tag-based output, so a
/// dialect overrides only what its format does differently.
pub trait Dialect: Send + Sync {
    /// Emit a character (or newline), escaped for the target format.
    fn escape_char(&self, text: &str, state: &mut RenderState<'_>) {
        state.push_str(text);
    }

    /// Emit a named symbol such as `&auml;`.
    fn symbol(&self, text: &str, state: &mut RenderState<'_>) {
        state.push_str(text);
    }

    fn link(&self, link: &WikiLink, state: &mut RenderState<'_>);

    fn image(&self, source: &str, state: &mut RenderState<'_>);

    /// Emit a preformatted block. The last character of the block is dropped.
    fn preformatted(&self, text: &str, state: &mut RenderState<'_>) {
        state.tag("startpre");
        let mut chars = text.chars();
        chars.next_back();
        for ch in chars {
            self.escape_char(ch.encode_utf8(&mut [0; 4]), state);
        }
        state.tag("endpre");
    }

    fn colour(&self, _colour: &str, _state: &mut RenderState<'_>) {}

    fn start_header(&self, depth: usize, state: &mut RenderState<'_>) {
        state.tag(&format!("startheader{depth}"));
    }

    fn end_header(&self, depth: usize, state: &mut RenderState<'_>) {
        state.tag(&format!("endheader{depth}"));
    }

    /// Emit a definition term; the data follows as ordinary tokens.
    fn definition(&self, term: &str, state: &mut RenderState<'_>) {
        state.tag("defitem");
        for ch in term.chars() {
            self.escape_char(ch.encode_utf8(&mut [0; 4]), state);
        }
        state.push('\n');
        state.tag("defitemclose");
        state.tag("defdata");
    }

    fn table_sizing(&self) -> Option<&dyn TableSizing> {
        None
    }

    /// Take over the pull loop for the given token.
    fn intercept(
        &self,
        _token: &Token,
        _input: &mut dyn TokenSource,
        _state: &mut RenderState<'_>,
    ) -> Result<Intercept, FormatError> {
        Ok(Intercept::Pass)
    }

    /// Called once after end of stream.
    fn finish(&self, _state: &mut RenderState<'_>) {}
}

/// A dialect bound to its tag map.
pub struct RenderEngine<D> {
    dialect: D,
    tags: TagMap,
}

impl<D: Dialect> RenderEngine<D> {
    pub fn new(dialect: D, tags: TagMap) -> Self {
        RenderEngine { dialect, tags }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Render a token stream to completion.
    pub fn render(&self, input: &mut dyn TokenSource) -> Result<Rendered, FormatError> {
        self.render_page(input, None)
    }

    /// Render a token stream that belongs to the named page.
    pub fn render_page(
        &self,
        input: &mut dyn TokenSource,
        page: Option<&str>,
    ) -> Result<Rendered, FormatError> {
        let mut state = RenderState::new(&self.tags, page);
        loop {
            let token = input.next_token()?;
            if token.is_eof() {
                break;
            }
            match self.dialect.intercept(&token, input, &mut state)? {
                Intercept::Pass => self.dispatch(&token, &mut state)?,
                Intercept::Handled => {}
                Intercept::EndOfStream => break,
            }
        }
        self.dialect.finish(&mut state);
        Ok(state.finish())
    }

    /// Lex, normalize and render wiki source text.
    pub fn render_source(&self, source: &str, page: Option<&str>) -> Result<Rendered, FormatError> {
        let mut input = StructuralNormalizer::new(WikiLexer::new(source));
        self.render_page(&mut input, page)
    }

    fn dispatch(&self, token: &Token, state: &mut RenderState<'_>) -> Result<(), FormatError> {
        let dialect = &self.dialect;
        match token.kind {
            TokenKind::Char | TokenKind::StartChar | TokenKind::Newline => {
                dialect.escape_char(&token.text, state)
            }
            TokenKind::Ignore => {}
            TokenKind::DefItem => dialect.definition(definition_term(&token.text), state),
            TokenKind::StartHeader | TokenKind::EndHeader => self.header(token, state),
            TokenKind::Escape => {
                if let Some(ch) = token.text.chars().last() {
                    dialect.escape_char(ch.encode_utf8(&mut [0; 4]), state);
                }
            }
            TokenKind::Image => dialect.image(image_source(&token.text), state),
            TokenKind::Link => dialect.link(&WikiLink::parse(&token.text), state),
            TokenKind::Pre => dialect.preformatted(&token.text, state),
            TokenKind::StartColour => dialect.colour(colour_name(&token.text), state),
            TokenKind::Symbol => dialect.symbol(&token.text, state),
            TokenKind::MultiRow | TokenKind::MultiSep => self.multi_column(token, state)?,
            _ => match dialect.table_sizing() {
                Some(sizing) => self.sized_table_token(sizing, token, state)?,
                None => emit_tag(token.kind, state)?,
            },
        }
        Ok(())
    }

    fn header(&self, token: &Token, state: &mut RenderState<'_>) {
        let depth = token.marker_depth();
        if !(1..=MAX_HEADER_DEPTH).contains(&depth) {
            tracing::warn!(
                depth,
                line = token.line,
                "header depth outside 1-{MAX_HEADER_DEPTH}, token dropped"
            );
            return;
        }
        if token.kind == TokenKind::StartHeader {
            self.dialect.start_header(depth, state);
        } else {
            self.dialect.end_header(depth, state);
        }
    }

    fn multi_column(&self, token: &Token, state: &mut RenderState<'_>) -> Result<(), FormatError> {
        let span = token.marker_depth().saturating_sub(1);
        let sizing = self.dialect.table_sizing();
        if let Some(sizing) = sizing {
            close_multi(sizing, state);
            if token.kind == TokenKind::MultiRow {
                state.table.row = span;
            } else {
                state.table.row += span;
            }
        }
        let name = token
            .kind
            .tag_name()
            .ok_or(FormatError::UnmappedToken(token.kind))?;
        if let Some(value) = state.tags().get(name) {
            state.push_str(&value.replacen("%d", &span.to_string(), 1));
        }
        if sizing.is_some() {
            state.table.multi_open = true;
        }
        Ok(())
    }

    fn sized_table_token(
        &self,
        sizing: &dyn TableSizing,
        token: &Token,
        state: &mut RenderState<'_>,
    ) -> Result<(), FormatError> {
        match token.kind {
            TokenKind::TableOpen => {
                state.table = TableScan {
                    start: state.out.len(),
                    ..TableScan::default()
                };
            }
            TokenKind::TableRow => state.table.row = 1,
            TokenKind::TableSep => {
                close_multi(sizing, state);
                state.table.row += 1;
            }
            TokenKind::TableEnd => {
                close_multi(sizing, state);
                state.table.widest = state.table.widest.max(state.table.row);
                state.table.row = 0;
            }
            TokenKind::TableClose => {
                close_multi(sizing, state);
                patch_directive(sizing, state);
            }
            _ => {}
        }
        emit_tag(token.kind, state)
    }
}

/// Default dispatch: append the tag literal for the token's semantic name.
pub fn emit_tag(kind: TokenKind, state: &mut RenderState<'_>) -> Result<(), FormatError> {
    let name = kind.tag_name().ok_or(FormatError::UnmappedToken(kind))?;
    state.tag(name);
    Ok(())
}

fn close_multi(sizing: &dyn TableSizing, state: &mut RenderState<'_>) {
    if state.table.multi_open {
        state.push_str(sizing.close_multi());
        state.table.multi_open = false;
    }
}

/// Replace the table's column directive, written at table open, in place.
fn patch_directive(sizing: &dyn TableSizing, state: &mut RenderState<'_>) {
    let start = state.table.start.min(state.out.len());
    let directive = sizing.directive();
    match state.out[start..].find(directive) {
        Some(offset) => {
            let at = start + offset;
            let sized = sizing.sized_directive(state.table.widest.max(1));
            state.out.replace_range(at..at + directive.len(), &sized);
        }
        None => tracing::debug!("table directive not found, column spec left unpatched"),
    }
}

/// Term of a `;term:` definition marker.
fn definition_term(text: &str) -> &str {
    let body = text.strip_prefix(';').unwrap_or(text);
    match body.find(':') {
        Some(idx) => &body[..idx],
        None => body,
    }
}

/// Colour name inside a `%{colour}` marker.
fn colour_name(text: &str) -> &str {
    text.strip_prefix("%{")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(text)
}
