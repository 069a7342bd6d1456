//! Rendering tests for the HTML and XHTML formats.

use crate::common::render;
use insta::assert_snapshot;

#[test]
fn test_mixed_page() {
    let source = "= Radi =\nSome **bold** text\nwith a [Other|link].\n\n* one\n** two\n\n|a|b|\n";
    assert_snapshot!(render("html", source), @r#"
    <h1>Radi</h1>

    <p>Some <b>bold</b> text
    with a <a href="Other.html">link</a>.
    </p>
    <ul>
    <li> one
    <ul>
    <li> two
    </li>
    </ul>
    </li>
    </ul>

    <table border="1">
    <tr><td>a</td><td>b</td></tr>
    </table>
    "#);
}

#[test]
fn test_xhtml_elements() {
    let xhtml = render("xhtml", "**b** //i//\\\\\n----\n->>\nc\n<<-");
    assert!(xhtml.starts_with("<p><strong>b</strong> <em>i</em><br />\n"));
    assert!(xhtml.contains("</p>\n<hr />\n"));
    assert!(xhtml.contains("<div style=\"text-align: center\">\n<p>c\n</p>\n</div>\n"));
}

#[test]
fn test_quote_closes_paragraph() {
    let html = render("html", "before\n\"\"\"\nquoted\n\"\"\"");
    assert_eq!(
        html,
        "<p>before\n</p>\n<blockquote>\n<p>quoted\n</p>\n</blockquote>\n"
    );
}

#[test]
fn test_quote_end_closes_table_first() {
    let html = render("html", "\"\"\"\n|a|b|\n\"\"\"");
    assert!(html.starts_with("<blockquote>\n<table border=\"1\">\n"));
    assert!(html.ends_with("</table>\n</blockquote>\n"));
}

#[test]
fn test_ordered_list_inside_unordered() {
    let html = render("html", "* a\n## b");
    assert_eq!(
        html,
        "<ul>\n<li> a\n<ol>\n<li> b\n</li>\n</ol>\n</li>\n</ul>\n"
    );
}

#[test]
fn test_superscript_and_subscript() {
    assert_eq!(
        render("html", "x^^2^^ a,,i,,"),
        "<p>x<sup>2</sup> a<sub>i</sub>\n</p>\n"
    );
}

#[test]
fn test_symbols_pass_through() {
    assert_eq!(render("html", "&auml;"), "<p>&auml;\n</p>\n");
}

#[test]
fn test_header_deeper_than_five_is_dropped() {
    assert_eq!(render("html", "====== deep ======"), "deep\n");
}
