//! Wiki text lexer
//!
//! Turns page source into the flat primitive token stream consumed by the
//! [`StructuralNormalizer`](crate::normalize::StructuralNormalizer). Lines are
//! classified first (header, list marker, table row, rule, preformatted
//! fence, quote and center toggles, paragraph text); the inline content of
//! each line is then scanned with a [`logos`] lexer.
//!
//! Inline markup:
//!
//! | Source          | Tokens                         |
//! |-----------------|--------------------------------|
//! | `**`            | `StartBold` / `EndBold`        |
//! | `//`            | `StartItal` / `EndItal`        |
//! | `^^`            | `StartSuper` / `EndSuper`      |
//! | `,,`            | `StartSub` / `EndSub`          |
//! | `%{red}` `%%`   | `StartColour`, `EndColour`     |
//! | `\\`            | `LineBreak`                    |
//! | `\x`            | `Escape`                       |
//! | `&auml;`        | `Symbol`                       |
//! | `[page\|label]` | `Link`                         |
//! | `{{file.png}}`  | `Image`                        |
//!
//! The lexer never fails: input it cannot classify degrades to characters.

use crate::error::FormatError;
use crate::token::{Token, TokenKind, TokenSource};
use logos::Logos;
use std::collections::VecDeque;
use std::iter::Enumerate;
use std::str::Lines;

/// Inline lexemes inside a single line.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Inline {
    #[token("**")]
    Bold,
    #[token("//")]
    Italic,
    #[token("^^")]
    Super,
    #[token(",,")]
    Sub,
    #[regex(r"%\{[^}\n]*\}")]
    ColourStart,
    #[token("%%")]
    ColourEnd,
    #[token(r"\\")]
    LineBreak,
    #[regex(r"\\[^\\\n]")]
    Escape,
    #[regex(r"&[A-Za-z]+;")]
    Symbol,
    #[regex(r"\[[^\]\n]+\]")]
    Link,
    #[regex(r"\{\{[^}\n]+\}\}")]
    Image,
    #[regex(r"\|+")]
    Pipes,
    #[regex(r"[^\n|]")]
    Text,
}

/// How characters on a line are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    /// Paragraph text: the first character opens a paragraph.
    Paragraph,
    /// Header, list or definition content.
    Nested,
    /// Table row: pipes are cell boundaries.
    Table,
}

#[derive(Debug, Default)]
struct Emphasis {
    bold: bool,
    italic: bool,
    superscript: bool,
    subscript: bool,
}

/// Pull-based lexer over wiki source text.
pub struct WikiLexer<'a> {
    lines: Enumerate<Lines<'a>>,
    pending: VecDeque<Token>,
    emphasis: Emphasis,
    in_quote: bool,
}

impl<'a> WikiLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        WikiLexer {
            lines: source.lines().enumerate(),
            pending: VecDeque::new(),
            emphasis: Emphasis::default(),
            in_quote: false,
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, line: usize, column: usize) {
        self.pending.push_back(Token::new(kind, text, line, column));
    }

    /// Lex the next source line into the pending queue. Returns false at end of input.
    fn fill(&mut self) -> bool {
        let Some((index, line)) = self.lines.next() else {
            return false;
        };
        let number = index + 1;
        let trimmed = line.trim();

        if trimmed == "{{{" {
            self.lex_preformatted(number);
        } else if trimmed.is_empty() {
            self.emphasis = Emphasis::default();
            self.push(TokenKind::ParEnd, "\n", number, 1);
        } else if trimmed == "\"\"\"" {
            let kind = if self.in_quote {
                TokenKind::EndQuote
            } else {
                TokenKind::StartQuote
            };
            self.in_quote = !self.in_quote;
            self.push(kind, trimmed, number, 1);
        } else if trimmed == "->>" {
            self.push(TokenKind::StartCenter, trimmed, number, 1);
        } else if trimmed == "<<-" {
            self.push(TokenKind::EndCenter, trimmed, number, 1);
        } else if is_run(trimmed, '-') {
            self.push(TokenKind::Rule, trimmed, number, 1);
        } else if is_run(trimmed, '=') {
            self.push(TokenKind::StrongRule, trimmed, number, 1);
        } else if line.starts_with('=') {
            self.lex_header(number, line);
        } else if let Some((kind, marker)) = list_marker(line) {
            self.push(kind, marker, number, 1);
            let rest = &line[marker.len()..];
            self.lex_inline(number, marker.chars().count(), rest, LineMode::Nested);
            self.push(TokenKind::Newline, "\n", number, line.chars().count() + 1);
        } else if let Some(term) = definition_marker(line) {
            self.push(TokenKind::DefItem, term, number, 1);
            let rest = &line[term.len()..];
            self.lex_inline(number, term.chars().count(), rest, LineMode::Nested);
            self.push(TokenKind::Newline, "\n", number, line.chars().count() + 1);
        } else if line.starts_with('|') {
            self.lex_inline(number, 0, line.trim_end(), LineMode::Table);
        } else {
            self.lex_inline(number, 0, line, LineMode::Paragraph);
            self.push(TokenKind::Newline, "\n", number, line.chars().count() + 1);
        }
        true
    }

    fn lex_preformatted(&mut self, start: usize) {
        let mut text = String::new();
        for (_, line) in self.lines.by_ref() {
            if line.trim() == "}}}" {
                break;
            }
            text.push_str(line);
            text.push('\n');
        }
        self.push(TokenKind::Pre, text, start, 1);
    }

    fn lex_header(&mut self, number: usize, line: &str) {
        let body = line.trim_end();
        let opening = body.len() - body.trim_start_matches('=').len();
        let inner = &body[opening..];
        let content = inner.trim_end_matches('=');
        let closing = inner.len() - content.len();

        self.push(TokenKind::StartHeader, &body[..opening], number, 1);
        let leading = content.len() - content.trim_start().len();
        let column = opening + content[..leading].chars().count();
        self.lex_inline(number, column, content.trim(), LineMode::Nested);
        if closing > 0 {
            let column = body[..opening + content.len()].chars().count() + 1;
            self.push(TokenKind::EndHeader, &inner[content.len()..], number, column);
        }
        self.push(TokenKind::Newline, "\n", number, line.chars().count() + 1);
    }

    fn lex_inline(&mut self, number: usize, offset: usize, text: &str, mode: LineMode) {
        let mut lexer = Inline::lexer(text);
        let mut first = true;
        let mut row_ended = false;

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let slice = lexer.slice();
            let column = offset + text[..span.start].chars().count() + 1;
            let kind = match result {
                Ok(Inline::Text) if first && mode == LineMode::Paragraph => TokenKind::StartChar,
                Ok(Inline::Text) => TokenKind::Char,
                Ok(Inline::Bold) => toggle(&mut self.emphasis.bold, TokenKind::StartBold, TokenKind::EndBold),
                Ok(Inline::Italic) => toggle(&mut self.emphasis.italic, TokenKind::StartItal, TokenKind::EndItal),
                Ok(Inline::Super) => toggle(
                    &mut self.emphasis.superscript,
                    TokenKind::StartSuper,
                    TokenKind::EndSuper,
                ),
                Ok(Inline::Sub) => toggle(&mut self.emphasis.subscript, TokenKind::StartSub, TokenKind::EndSub),
                Ok(Inline::ColourStart) => TokenKind::StartColour,
                Ok(Inline::ColourEnd) => TokenKind::EndColour,
                Ok(Inline::LineBreak) => TokenKind::LineBreak,
                Ok(Inline::Escape) => TokenKind::Escape,
                Ok(Inline::Symbol) => TokenKind::Symbol,
                Ok(Inline::Link) => TokenKind::Link,
                Ok(Inline::Image) => TokenKind::Image,
                Ok(Inline::Pipes) if mode == LineMode::Table => {
                    let multi = slice.len() > 1;
                    if span.start == 0 {
                        if multi {
                            TokenKind::MultiRow
                        } else {
                            TokenKind::TableRow
                        }
                    } else if span.end == text.len() {
                        row_ended = true;
                        TokenKind::TableEnd
                    } else if multi {
                        TokenKind::MultiSep
                    } else {
                        TokenKind::TableSep
                    }
                }
                Ok(Inline::Pipes) | Err(()) => {
                    let start_char = first && mode == LineMode::Paragraph;
                    self.push_chars(number, column, slice, start_char);
                    first = false;
                    continue;
                }
            };
            self.push(kind, slice, number, column);
            first = false;
        }

        if mode == LineMode::Table && !row_ended {
            let column = offset + text.chars().count() + 1;
            self.push(TokenKind::TableEnd, "", number, column);
        }
    }

    fn push_chars(&mut self, number: usize, column: usize, slice: &str, start_char: bool) {
        for (i, ch) in slice.chars().enumerate() {
            let kind = if start_char && i == 0 {
                TokenKind::StartChar
            } else {
                TokenKind::Char
            };
            self.push(kind, ch.to_string(), number, column + i);
        }
    }
}

impl TokenSource for WikiLexer<'_> {
    fn next_token(&mut self) -> Result<Token, FormatError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            if !self.fill() {
                return Ok(Token::eof());
            }
        }
    }
}

fn toggle(flag: &mut bool, start: TokenKind, end: TokenKind) -> TokenKind {
    *flag = !*flag;
    if *flag {
        start
    } else {
        end
    }
}

/// A line made of at least four copies of `ch`.
fn is_run(text: &str, ch: char) -> bool {
    text.len() >= 4 && text.chars().all(|c| c == ch)
}

/// Leading `*` or `#` run followed by a space.
fn list_marker(line: &str) -> Option<(TokenKind, &str)> {
    let first = line.chars().next()?;
    let kind = match first {
        '*' => TokenKind::UlItem,
        '#' => TokenKind::OlItem,
        _ => return None,
    };
    let run = line.len() - line.trim_start_matches(first).len();
    line[run..].starts_with(' ').then(|| (kind, &line[..run]))
}

/// `;term:` prefix of a definition line, colon included.
fn definition_marker(line: &str) -> Option<&str> {
    if !line.starts_with(';') {
        return None;
    }
    line.find(':').map(|idx| &line[..=idx])
}
