//! Structural normalization of a flat token stream.
//!
//! # The High-Level Concept
//!
//! The lexer only reports what it sees on a line: a list marker, a table pipe,
//! a character. Block structure (where a paragraph opens, where a nested list
//! closes) is implicit. [`StructuralNormalizer`] wraps any [`TokenSource`] and
//! inserts the implicit open/close tokens, so renderers can treat every block
//! as an explicitly bracketed region.
//!
//! # The Algorithm
//!
//! 1. **Pending queue first:** synthesized tokens wait in a FIFO. A pull is
//!    served from that queue while it is non-empty.
//!
//! 2. **State dispatch:** otherwise a raw token is pulled and handed to the
//!    handler for the state on top of the stack. A handler either
//!    - returns [`Step::Keep`]: the raw token passes through, or
//!    - returns [`Step::Change`]: it pushed or popped a state and queued zero or
//!      more synthetic tokens. The same raw token is dispatched again against
//!      the new top state.
//!
//! 3. **Cascades:** the loop in step 2 runs until a handler keeps the token, so
//!    one dedented list marker can close several nested levels at once. The
//!    raw token is queued behind everything it caused.
//!
//! 4. **End of stream:** `Eof` is a closer for every state except `Empty`, so
//!    it unwinds the whole stack innermost first before it is returned.
//!
//! # Nesting Depth
//!
//! List markers carry their depth as the trimmed length of their text. Each
//! list and item state records the depth it was opened at; a marker is
//! compared against the depth on top of the stack.

use crate::error::FormatError;
use crate::token::{Token, TokenKind, TokenSource};
use std::collections::VecDeque;

/// Block context currently open in the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Empty,
    Paragraph,
    UnorderedList { depth: usize },
    UnorderedItem { depth: usize },
    OrderedList { depth: usize },
    OrderedItem { depth: usize },
    DefinitionList,
    DefinitionItem,
    Table,
    Header { depth: usize },
}

/// Outcome of one handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Change,
}

/// Which list family a marker or state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn of_marker(kind: TokenKind) -> Option<ListKind> {
        match kind {
            TokenKind::UlItem => Some(ListKind::Unordered),
            TokenKind::OlItem => Some(ListKind::Ordered),
            _ => None,
        }
    }

    fn list_state(self, depth: usize) -> State {
        match self {
            ListKind::Unordered => State::UnorderedList { depth },
            ListKind::Ordered => State::OrderedList { depth },
        }
    }

    fn item_state(self, depth: usize) -> State {
        match self {
            ListKind::Unordered => State::UnorderedItem { depth },
            ListKind::Ordered => State::OrderedItem { depth },
        }
    }

    fn open(self) -> TokenKind {
        match self {
            ListKind::Unordered => TokenKind::UlListOpen,
            ListKind::Ordered => TokenKind::OlListOpen,
        }
    }

    fn close(self) -> TokenKind {
        match self {
            ListKind::Unordered => TokenKind::UlListClose,
            ListKind::Ordered => TokenKind::OlListClose,
        }
    }

    fn item_close(self) -> TokenKind {
        match self {
            ListKind::Unordered => TokenKind::UlItemClose,
            ListKind::Ordered => TokenKind::OlItemClose,
        }
    }
}

/// Token source that inserts implicit block boundaries.
pub struct StructuralNormalizer<S> {
    upstream: S,
    stack: Vec<State>,
    pending: VecDeque<Token>,
}

impl<S: TokenSource> StructuralNormalizer<S> {
    pub fn new(upstream: S) -> Self {
        StructuralNormalizer {
            upstream,
            stack: vec![State::Empty],
            pending: VecDeque::new(),
        }
    }

    /// Current state stack, bottom first.
    pub fn states(&self) -> &[State] {
        &self.stack
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }

    fn top(&self) -> Result<State, FormatError> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| FormatError::InvalidState("state stack is empty".to_string()))
    }

    fn pop(&mut self) -> Result<State, FormatError> {
        if self.stack.len() > 1 {
            if let Some(state) = self.stack.pop() {
                return Ok(state);
            }
        }
        Err(FormatError::InvalidState(
            "attempted to pop the base state".to_string(),
        ))
    }

    fn emit(&mut self, kind: TokenKind, cause: &Token) {
        self.pending.push_back(Token::synthetic(kind, cause));
    }

    /// Depth of the innermost open list, or zero outside any list.
    fn enclosing_list_depth(&self) -> usize {
        self.stack
            .iter()
            .rev()
            .find_map(|state| match state {
                State::UnorderedList { depth }
                | State::UnorderedItem { depth }
                | State::OrderedList { depth }
                | State::OrderedItem { depth } => Some(*depth),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn open_list(&mut self, list: ListKind, depth: usize, cause: &Token) -> Step {
        self.emit(list.open(), cause);
        self.stack.push(list.list_state(depth));
        Step::Change
    }

    fn close_with(&mut self, kind: TokenKind, cause: &Token) -> Result<Step, FormatError> {
        self.emit(kind, cause);
        self.pop()?;
        Ok(Step::Change)
    }

    fn step(&mut self, state: State, token: &mut Token) -> Result<Step, FormatError> {
        match state {
            State::Empty => Ok(self.on_empty(token)),
            State::Paragraph => self.on_paragraph(token),
            State::UnorderedList { depth } => self.on_list(ListKind::Unordered, depth, token),
            State::OrderedList { depth } => self.on_list(ListKind::Ordered, depth, token),
            State::UnorderedItem { depth } => self.on_item(ListKind::Unordered, depth, token),
            State::OrderedItem { depth } => self.on_item(ListKind::Ordered, depth, token),
            State::DefinitionList => self.on_definition_list(token),
            State::DefinitionItem => self.on_definition_item(token),
            State::Table => self.on_table(token),
            State::Header { depth } => self.on_header(depth, token),
        }
    }

    fn on_empty(&mut self, token: &mut Token) -> Step {
        use TokenKind::*;
        match token.kind {
            StartChar | Link | Image | StartBold | StartItal | StartColour | StartSuper
            | StartSub | Escape | Symbol => {
                self.emit(ParOpen, token);
                self.stack.push(State::Paragraph);
                Step::Change
            }
            UlItem => self.open_list(ListKind::Unordered, 1, token),
            OlItem => self.open_list(ListKind::Ordered, 1, token),
            TableRow | MultiRow => {
                self.emit(TableOpen, token);
                self.stack.push(State::Table);
                Step::Change
            }
            DefItem => {
                self.emit(DefListOpen, token);
                self.stack.push(State::DefinitionList);
                Step::Change
            }
            StartHeader => {
                self.stack.push(State::Header {
                    depth: token.marker_depth(),
                });
                Step::Keep
            }
            ParEnd => {
                // A stray blank line outside any block renders as plain text.
                token.kind = Char;
                Step::Keep
            }
            _ => Step::Keep,
        }
    }

    fn on_paragraph(&mut self, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        match token.kind {
            ParEnd => {
                self.pop()?;
                Ok(Step::Keep)
            }
            StartHeader | Rule | StrongRule | UlItem | OlItem | DefItem | TableRow | MultiRow
            | Pre | StartCenter | EndCenter | StartQuote | EndQuote | Eof => {
                self.close_with(ParEnd, token)
            }
            _ => Ok(Step::Keep),
        }
    }

    fn on_list(&mut self, list: ListKind, depth: usize, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        if ListKind::of_marker(token.kind) == Some(list) {
            let declared = token.marker_depth();
            return if declared == depth {
                self.stack.push(list.item_state(depth));
                Ok(Step::Keep)
            } else if declared < depth {
                self.close_with(list.close(), token)
            } else {
                Ok(self.open_list(list, depth + 1, token))
            };
        }
        match token.kind {
            StartChar | ParEnd | Pre | DefItem | TableRow | MultiRow | StartHeader | Rule
            | StrongRule | StartCenter | EndCenter | StartQuote | EndQuote | UlItem | OlItem
            | Eof => self.close_with(list.close(), token),
            _ => Ok(Step::Keep),
        }
    }

    fn on_item(&mut self, list: ListKind, depth: usize, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        if let Some(marker) = ListKind::of_marker(token.kind) {
            let declared = token.marker_depth();
            return if declared > depth {
                Ok(self.open_list(marker, depth + 1, token))
            } else {
                self.close_with(list.item_close(), token)
            };
        }
        match token.kind {
            StartChar | ParEnd | Pre | DefItem | TableRow | MultiRow | StartHeader | Rule
            | StrongRule | StartCenter | EndCenter | StartQuote | EndQuote | Eof => {
                self.close_with(list.item_close(), token)
            }
            _ => Ok(Step::Keep),
        }
    }

    fn on_definition_list(&mut self, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        match token.kind {
            DefItem => {
                self.stack.push(State::DefinitionItem);
                Ok(Step::Keep)
            }
            StartChar | ParEnd | Pre | TableRow | MultiRow | StartHeader | Rule | StrongRule
            | StartCenter | EndCenter | StartQuote | EndQuote | Eof => {
                self.close_with(DefListClose, token)
            }
            _ => Ok(Step::Keep),
        }
    }

    fn on_definition_item(&mut self, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        if let Some(marker) = ListKind::of_marker(token.kind) {
            let depth = self.enclosing_list_depth() + 1;
            return Ok(self.open_list(marker, depth, token));
        }
        match token.kind {
            DefItem | StartChar | ParEnd | Pre | TableRow | MultiRow | StartHeader | Rule
            | StrongRule | StartCenter | EndCenter | StartQuote | EndQuote | Eof => {
                self.close_with(DefDataClose, token)
            }
            _ => Ok(Step::Keep),
        }
    }

    fn on_table(&mut self, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        match token.kind {
            StartChar | ParEnd | Pre | DefItem | UlItem | OlItem | StartHeader | Rule
            | StrongRule | StartCenter | EndCenter | StartQuote | EndQuote | Eof => {
                self.close_with(TableClose, token)
            }
            _ => Ok(Step::Keep),
        }
    }

    fn on_header(&mut self, depth: usize, token: &Token) -> Result<Step, FormatError> {
        use TokenKind::*;
        match token.kind {
            EndHeader => {
                self.pop()?;
                Ok(Step::Keep)
            }
            StartChar | ParEnd | Pre | DefItem | UlItem | OlItem | TableRow | MultiRow
            | StartHeader | Rule | StrongRule | StartCenter | EndCenter | EndQuote | Eof => {
                self.pending.push_back(Token::new(
                    EndHeader,
                    "=".repeat(depth),
                    token.line,
                    token.column,
                ));
                self.pop()?;
                Ok(Step::Change)
            }
            _ => Ok(Step::Keep),
        }
    }
}

impl<S: TokenSource> TokenSource for StructuralNormalizer<S> {
    fn next_token(&mut self) -> Result<Token, FormatError> {
        if let Some(queued) = self.pending.pop_front() {
            return Ok(queued);
        }

        let mut raw = self.upstream.next_token()?;
        loop {
            let state = self.top()?;
            if self.step(state, &mut raw)? == Step::Keep {
                break;
            }
        }

        match self.pending.pop_front() {
            Some(first) => {
                self.pending.push_back(raw);
                Ok(first)
            }
            None => Ok(raw),
        }
    }
}
