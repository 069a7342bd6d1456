//! Wiki text conversion for radi page databases
//!
//!     This crate turns pages written in radi wiki markup into HTML, XHTML, LaTeX (article, book),
//!     slide decks (Beamer, Prosper, S5) and Markdown, and exports a page together with every
//!     page it links to.
//!
//!     This is a pure lib: it powers radi-cli but makes no assumption about a shell. It never
//!     prints; diagnostics go through `tracing`.
//!
//! Architecture
//!
//!     The pipeline has three pull-based stages chained through the [`TokenSource`] trait:
//!
//!         source text -> WikiLexer -> StructuralNormalizer -> RenderEngine -> output text
//!
//!     - The lexer (./lexer.rs) emits a flat stream of primitive tokens: characters, emphasis
//!       toggles, list and table markers, headers, links, images.
//!     - The normalizer (./normalize.rs) is a stack machine that inserts the implicit block
//!       boundaries the markup leaves out: paragraph open/close, list and item open/close,
//!       definition lists, tables. Its output is balanced: every opener is closed by end of
//!       stream.
//!     - The render engine (./render.rs) maps each normalized token to output, either through
//!       the format's tag map or through one of the dialect hooks.
//!
//!     The file structure :
//!     .
//!     ├── token.rs                # Token, TokenKind, TokenSource
//!     ├── lexer.rs                # wiki text -> primitive tokens
//!     ├── normalize.rs            # implicit block structure
//!     ├── tags.rs                 # key=value tag maps
//!     ├── render.rs               # RenderEngine and the Dialect hooks
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── store.rs                # PageStore capability
//!     ├── export.rs               # link graph traversal
//!     ├── formats
//!     │   ├── html                # html, xhtml
//!     │   ├── latex               # latex, latex-book
//!     │   ├── slides              # beamer, prosper, s5
//!     │   ├── markdown
//!     │   └── source              # raw source re-export
//!     └── common                  # link parsing
//!
//! Formats
//!
//!     A format is a tag map (./tags/<name>.tags) plus a dialect. The tag map covers everything
//!     that is a fixed literal in the target language; the dialect covers what is not: escaping,
//!     link rewriting, images, verbatim blocks and headers. Stateful behaviour (LaTeX column
//!     sizing, slide titles, Markdown tables) lives in the dialect too, with the per-pass state
//!     kept in [`RenderState`] so that one engine can render any number of pages.
//!
//! Export
//!
//!     [`export`] walks the link graph breadth first from a start page. Per-page formats write
//!     one file per visited page; combined formats (LaTeX, slides) write one document holding
//!     every page in visiting order. Local images are copied next to the output.
//!
//! Testing
//!     tests
//!     ├── common              # render helper, temporary page databases
//!     ├── <format>/           # html, latex, markdown, slides
//!     └── export/             # traversal and asset copying
//!
//!     Note that rust does not by default discover tests in subdirectories, so tests/lib.rs
//!     includes the per-format modules.
pub mod common;
pub mod error;
pub mod export;
pub mod format;
pub mod formats;
pub mod lexer;
pub mod normalize;
pub mod registry;
pub mod render;
pub mod store;
pub mod tags;
pub mod token;

pub use error::FormatError;
pub use export::{export, export_with, ExportContext, ExportReport, ExportSpec};
pub use format::{Format, Layout, RenderedPage};
pub use lexer::WikiLexer;
pub use normalize::StructuralNormalizer;
pub use registry::FormatRegistry;
pub use render::{Dialect, RenderEngine, RenderState, Rendered};
pub use store::{FsPageStore, MemoryPageStore, PageStore};
pub use tags::TagMap;
pub use token::{Token, TokenKind, TokenSource};
