//! Slide deck exports.

use crate::common::{read, wiki};
use radi_babel::{export, ExportSpec, FsPageStore};
use std::fs;

#[test]
fn test_beamer_deck_from_store_template() {
    let dir = wiki(&[
        ("Talk", "= My Talk =\n== Intro ==\nhello [Details]\n"),
        ("Details", "== Details ==\n* point\n"),
    ]);
    fs::write(
        dir.path().join("beamer.template"),
        "\\title{!!TITLE!!}\n!!CONTENT!!\n\\end{document}\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let report = export(
        &ExportSpec::new("beamer", "Talk", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert_eq!(report.pages, vec!["Talk", "Details"]);
    assert_eq!(report.artifacts, vec![out.join("Talk.tex")]);

    let deck = read(&out, "Talk.tex");
    assert!(deck.starts_with("\\title{My Talk}\n"));
    assert!(deck.contains("\\begin{frame}\n\\frametitle{Intro}\n"));
    assert!(deck.contains("hello \\ref{Details}"));
    assert!(deck.contains("\\begin{frame}\n\\frametitle{Details}\n"));
    assert_eq!(deck.matches("\\begin{frame}").count(), 2);
    assert_eq!(deck.matches("\\end{frame}").count(), 2);
    assert!(deck.ends_with("\\end{document}\n"));
}

#[test]
fn test_s5_deck_with_builtin_template() {
    let dir = wiki(&[("Start", "= Show =\n== One ==\n<b>\n")]);
    let out = dir.path().join("out");

    export(
        &ExportSpec::new("s5", "Start", &out),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();

    let show = read(&out, "Start.html");
    assert!(show.contains("<title>Show</title>"));
    assert!(show.contains("<div class=\"slide\">\n<h1>One</h1>\n"));
    assert!(show.contains("&lt;b&gt;"));
    assert!(!show.contains("!!CONTENT!!"));
}

#[test]
fn test_explicit_template_path() {
    let dir = wiki(&[("Start", "== A ==\n")]);
    let template = dir.path().join("custom.tpl");
    fs::write(&template, "<<!!CONTENT!!>>").unwrap();
    let out = dir.path().join("out");

    export(
        &ExportSpec::new("prosper", "Start", &out).with_template(&template),
        &FsPageStore::new(dir.path()),
    )
    .unwrap();
    assert_eq!(
        read(&out, "Start.tex"),
        "<<\\begin{slide}{A}\n\n\\end{slide}\n>>"
    );
}
