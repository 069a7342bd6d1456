//! Token stream dumps for the `tokens` command
//!
//! Each transform is a stage + format combination:
//!
//! - `token-raw-*`: tokens as the lexer produces them
//! - `token-*`: tokens after structural normalization, as renderers see them
//!
//! The `simple` form prints one token kind per line, `json` prints every
//! token with its text and source position.

use radi_babel::token::collect_tokens;
use radi_babel::{StructuralNormalizer, Token, TokenSource, WikiLexer};

/// All available CLI transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "token-raw-simple",
    "token-raw-json",
    "token-simple",
    "token-json",
];

/// Execute a named transform on page source text
///
/// # Examples
///
/// ```ignore
/// let output = execute_transform("= Title =\ntext", "token-simple")?;
/// ```
pub fn execute_transform(source: &str, transform_name: &str) -> Result<String, String> {
    match transform_name {
        "token-raw-simple" => Ok(tokens_to_simple(&raw_tokens(source)?)),
        "token-raw-json" => tokens_to_json(&raw_tokens(source)?),
        "token-simple" => Ok(tokens_to_simple(&normalized_tokens(source)?)),
        "token-json" => tokens_to_json(&normalized_tokens(source)?),
        _ => Err(format!("Unknown transform: {transform_name}")),
    }
}

fn raw_tokens(source: &str) -> Result<Vec<Token>, String> {
    let mut lexer = WikiLexer::new(source);
    collect(&mut lexer)
}

fn normalized_tokens(source: &str) -> Result<Vec<Token>, String> {
    let mut normalizer = StructuralNormalizer::new(WikiLexer::new(source));
    collect(&mut normalizer)
}

fn collect(source: &mut dyn TokenSource) -> Result<Vec<Token>, String> {
    collect_tokens(source).map_err(|e| format!("Transform failed: {e}"))
}

fn tokens_to_json(tokens: &[Token]) -> Result<String, String> {
    serde_json::to_string_pretty(tokens).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn tokens_to_simple(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        output.push_str(&format!("{:?}", token.kind));
        output.push('\n');
    }
    output
}
