//! Format implementations
//!
//! Each format pairs a tag map with a dialect and decides how rendered pages
//! become export artifacts.

pub mod html;
pub mod latex;
pub mod markdown;
pub mod slides;
pub mod source;

pub use html::HtmlFormat;
pub use latex::LatexFormat;
pub use markdown::MarkdownFormat;
pub use slides::SlideFormat;
pub use source::SourceFormat;
