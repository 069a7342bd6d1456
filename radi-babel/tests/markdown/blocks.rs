//! Rendering tests for the Markdown format.

use crate::common::render;
use insta::assert_snapshot;

#[test]
fn test_document() {
    let source = "* one\n** two\n\n\"\"\"\nsaid\n\"\"\"\n{{{\ncode\n}}}\nend";
    assert_snapshot!(render("markdown", source), @r"
    * one
        * two


    > said

        code
    end
    ");
}

#[test]
fn test_table_cells_keep_inline_text() {
    let md = render("markdown", "|[Page]|**b**|");
    assert!(md.contains("[Page](Page.md)"));
    assert!(md.contains("**b**"));
}

#[test]
fn test_rules() {
    assert_eq!(render("markdown", "----\n===="), "\n---\n\n\n***\n\n");
}
