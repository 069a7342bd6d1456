//! Rendering tests for the LaTeX article and book formats.

use crate::common::render;
use insta::assert_snapshot;

#[test]
fn test_lists_and_definitions() {
    let latex = render("latex", "* a\n** b\n;term:data");
    assert_snapshot!(latex, @r"
    \begin{itemize}
    \item  a
    \begin{itemize}
    \item  b

    \end{itemize}

    \end{itemize}
    \begin{description}
    \item[term
    ]data

    \end{description}
    ");
}

#[test]
fn test_unequal_rows_use_widest() {
    let latex = render("latex", "|a|b|\n|c|d|e|\n|f|g|");
    assert_eq!(latex.matches("\\begin{tabular}{|c|c|c|}\n").count(), 1);
}

#[test]
fn test_rules_and_line_breaks() {
    let latex = render("latex", "a\\\\b\n----");
    assert_eq!(latex, "\na\\\\\nb\n\n\n\n\\hrule\n");
}

#[test]
fn test_book_uses_chapters() {
    let latex = render("latex-book", "= One =\n== Two ==");
    assert!(latex.starts_with("\\chapter{One}\n"));
    assert!(latex.contains("\\section{Two}\n"));
}
