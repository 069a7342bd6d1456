//! Token model and the pull-based token source capability
//!
//! A [`Token`] is the unit exchanged between the lexer, the
//! [`StructuralNormalizer`](crate::normalize::StructuralNormalizer) and the
//! render engine. Primitive kinds come from the lexer; implicit kinds are
//! only ever produced by the normalizer.
//!
//! End of input is not an error: every source signals it by returning a token
//! of kind [`TokenKind::Eof`], and keeps returning it on further pulls.

use crate::error::FormatError;
use serde::Serialize;
use std::collections::VecDeque;

/// Closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Primitive kinds produced by the lexer.
    StartHeader,
    EndHeader,
    StartChar,
    Char,
    ParEnd,
    Link,
    StartSuper,
    EndSuper,
    StartSub,
    EndSub,
    StartBold,
    EndBold,
    StartItal,
    EndItal,
    Newline,
    Escape,
    Pre,
    UlItem,
    OlItem,
    DefItem,
    Image,
    TableRow,
    TableSep,
    TableEnd,
    Rule,
    StrongRule,
    LineBreak,
    StartCenter,
    EndCenter,
    StartQuote,
    EndQuote,
    StartColour,
    EndColour,
    MultiSep,
    MultiRow,
    Symbol,

    // Implicit kinds synthesized by the normalizer.
    ParOpen,
    TableOpen,
    TableClose,
    DefListOpen,
    DefListClose,
    DefItemClose,
    DefDataClose,
    UlListOpen,
    UlListClose,
    UlItemClose,
    OlListOpen,
    OlListClose,
    OlItemClose,
    Ignore,
    Eof,
}

impl TokenKind {
    /// Semantic name used as the tag map key for this kind.
    ///
    /// Kinds that are always routed to a render hook (characters, headers,
    /// links, images, preformatted text, colour starts, multi-column markers,
    /// symbols, definition terms) and the `Ignore`/`Eof` kinds have no name.
    pub fn tag_name(self) -> Option<&'static str> {
        use TokenKind::*;
        let name = match self {
            EndBold => "endbold",
            EndItal => "endital",
            EndSub => "endsub",
            EndSuper => "endsuper",
            StartBold => "startbold",
            StartItal => "startital",
            StartSub => "startsub",
            StartSuper => "startsuper",
            OlItemClose => "endolitem",
            OlItem => "startolitem",
            OlListClose => "endol",
            OlListOpen => "startol",
            UlItemClose => "endulitem",
            UlItem => "startulitem",
            UlListClose => "endul",
            UlListOpen => "startul",
            ParEnd => "parend",
            ParOpen => "parstart",
            TableClose => "endtable",
            TableOpen => "tablestart",
            TableRow => "tablerowstart",
            TableEnd => "tablerowend",
            TableSep => "tablesep",
            MultiRow => "tablerowmultistart",
            MultiSep => "tablemultisep",
            DefListClose => "enddef",
            DefListOpen => "startdef",
            DefItemClose => "defitemclose",
            DefDataClose => "defdataclose",
            Rule => "rule",
            StrongRule => "strongrule",
            LineBreak => "linebreak",
            StartCenter => "startcenter",
            EndCenter => "endcenter",
            StartQuote => "startquote",
            EndQuote => "endquote",
            EndColour => "endcolour",
            _ => return None,
        };
        Some(name)
    }

    /// True for kinds that only the normalizer produces.
    pub fn is_synthetic(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            ParOpen
                | TableOpen
                | TableClose
                | DefListOpen
                | DefListClose
                | DefItemClose
                | DefDataClose
                | UlListOpen
                | UlListClose
                | UlItemClose
                | OlListOpen
                | OlListClose
                | OlItemClose
                | Ignore
                | Eof
        )
    }
}

/// A single lexical or structural token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// A synthetic token carrying the position of the token that caused it.
    pub fn synthetic(kind: TokenKind, cause: &Token) -> Self {
        Token::new(kind, "", cause.line, cause.column)
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, "", 0, 0)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Nesting depth declared by a marker token: the trimmed length of its text.
    pub fn marker_depth(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Pull interface over a token stream.
pub trait TokenSource {
    /// Produce the next token, or an [`TokenKind::Eof`] token once exhausted.
    fn next_token(&mut self) -> Result<Token, FormatError>;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Token, FormatError> {
        (**self).next_token()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn next_token(&mut self) -> Result<Token, FormatError> {
        (**self).next_token()
    }
}

/// Replays a fixed list of tokens.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    tokens: VecDeque<Token>,
}

impl VecSource {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        VecSource {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl TokenSource for VecSource {
    fn next_token(&mut self) -> Result<Token, FormatError> {
        Ok(self.tokens.pop_front().unwrap_or_else(Token::eof))
    }
}

/// Pulls every token up to, but not including, end of stream.
pub fn collect_tokens(source: &mut dyn TokenSource) -> Result<Vec<Token>, FormatError> {
    let mut tokens = Vec::new();
    loop {
        let token = source.next_token()?;
        if token.is_eof() {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}
