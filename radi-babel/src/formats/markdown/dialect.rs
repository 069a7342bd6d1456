//! Render hooks for Markdown output.
//!
//! Quotes and tables are not tag based: the dialect takes over the pull loop
//! when one starts and formats the whole block once it is closed.

use crate::common::links::{image_source, is_remote, WikiLink};
use crate::error::FormatError;
use crate::render::{Dialect, Intercept, RenderState};
use crate::token::{Token, TokenKind, TokenSource};

/// Extra width of every table column.
const COLUMN_PADDING: usize = 3;
const COLUMN_GAP: &str = "   ";
const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownDialect;

impl MarkdownDialect {
    /// Text of an inline token gathered into a quote or table cell.
    ///
    /// Links and images go through their hooks so that their targets are
    /// registered like anywhere else on the page.
    fn inline_text(&self, token: &Token, state: &mut RenderState<'_>) -> String {
        match token.kind {
            TokenKind::Link => {
                state.begin_capture();
                self.link(&WikiLink::parse(&token.text), state);
                state.end_capture()
            }
            TokenKind::Image => {
                state.begin_capture();
                self.image(image_source(&token.text), state);
                state.end_capture()
            }
            TokenKind::Escape => token.text.chars().last().map(String::from).unwrap_or_default(),
            _ => token.text.clone(),
        }
    }

    /// Gather quoted lines up to the closing marker.
    fn quote(
        &self,
        input: &mut dyn TokenSource,
        state: &mut RenderState<'_>,
    ) -> Result<Intercept, FormatError> {
        let mut text = String::new();
        let mut outcome = Intercept::Handled;
        loop {
            let token = input.next_token()?;
            match token.kind {
                TokenKind::EndQuote => break,
                TokenKind::Eof => {
                    outcome = Intercept::EndOfStream;
                    break;
                }
                _ => text.push_str(&self.inline_text(&token, state)),
            }
        }

        state.push('\n');
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                state.push_str(">\n");
            } else {
                state.push_str(&format!("> {line}\n"));
            }
        }
        state.push('\n');
        Ok(outcome)
    }

    /// Gather table cells up to the table close.
    fn table(
        &self,
        input: &mut dyn TokenSource,
        state: &mut RenderState<'_>,
    ) -> Result<Intercept, FormatError> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut cell = String::new();
        let mut outcome = Intercept::Handled;
        loop {
            let token = input.next_token()?;
            match token.kind {
                TokenKind::TableRow | TokenKind::MultiRow => {
                    rows.push(Vec::new());
                    cell.clear();
                }
                TokenKind::TableSep | TokenKind::MultiSep | TokenKind::TableEnd => {
                    if let Some(row) = rows.last_mut() {
                        row.push(cell.trim().to_string());
                    }
                    cell.clear();
                }
                TokenKind::Newline => {}
                TokenKind::TableClose => break,
                TokenKind::Eof => {
                    outcome = Intercept::EndOfStream;
                    break;
                }
                _ => cell.push_str(&self.inline_text(&token, state)),
            }
        }
        state.push_str(&format_table(&rows));
        Ok(outcome)
    }
}

/// Headerless pandoc simple table: dashed lines around left aligned cells.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let dashes: String = widths
        .iter()
        .map(|width| format!("{}{COLUMN_GAP}", "-".repeat(width + COLUMN_PADDING)))
        .collect();

    let mut out = String::from("\n");
    out.push_str(&dashes);
    out.push('\n');
    for row in rows {
        for (index, width) in widths.iter().enumerate() {
            let cell = row.get(index).map(String::as_str).unwrap_or("");
            out.push_str(&format!(
                "{cell:<pad$}{COLUMN_GAP}",
                pad = width + COLUMN_PADDING
            ));
        }
        out.push('\n');
    }
    out.push_str(&dashes);
    out.push_str("\n\n");
    out
}

impl Dialect for MarkdownDialect {
    fn link(&self, link: &WikiLink, state: &mut RenderState<'_>) {
        let href = if link.is_external() || link.is_anchor() {
            link.target.clone()
        } else {
            state.register_link(link.page());
            match link.anchor() {
                Some(anchor) => format!("{}.md#{anchor}", link.page()),
                None => format!("{}.md", link.page()),
            }
        };
        state.push_str(&format!("[{}]({href})", link.label));
    }

    fn image(&self, source: &str, state: &mut RenderState<'_>) {
        state.push_str(&format!("![]({source})"));
        if !is_remote(source) {
            state.register_asset(source);
        }
    }

    fn preformatted(&self, text: &str, state: &mut RenderState<'_>) {
        for line in text.lines() {
            state.push_str(INDENT);
            state.push_str(line);
            state.push('\n');
        }
    }

    fn start_header(&self, depth: usize, state: &mut RenderState<'_>) {
        state.push('\n');
        state.tag(&format!("startheader{depth}"));
        state.push(' ');
    }

    fn definition(&self, term: &str, state: &mut RenderState<'_>) {
        state.push_str(&format!("* **{term}** "));
    }

    fn intercept(
        &self,
        token: &Token,
        input: &mut dyn TokenSource,
        state: &mut RenderState<'_>,
    ) -> Result<Intercept, FormatError> {
        match token.kind {
            TokenKind::StartQuote => return self.quote(input, state),
            TokenKind::TableOpen => return self.table(input, state),
            TokenKind::UlListOpen | TokenKind::OlListOpen => state.enter(),
            TokenKind::UlListClose | TokenKind::OlListClose => state.leave(),
            TokenKind::UlItem | TokenKind::OlItem => {
                let depth = state.nesting().saturating_sub(1);
                state.push_str(&INDENT.repeat(depth));
            }
            _ => {}
        }
        Ok(Intercept::Pass)
    }
}
